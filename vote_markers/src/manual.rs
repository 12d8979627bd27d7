/*!

This is the long-form manual for `vote_markers` and `dotmarkers`.

## How markers are allocated

Each marker stands for exactly `votesPerMarker` votes of one candidate. The
regions (counties) are first split by group (state): votes are never pooled
across a state border. Within a group, the algorithm runs in two passes.

**Direct markers.** A region with at least `votesPerMarker` votes for a candidate
gets `floor(votes / votesPerMarker)` markers of its own, all placed at the
centroid of the region. What is left is always smaller than one marker.

**Pooled markers.** The leftovers are then collected by walking the adjacency
graph of the group, one candidate at a time:
- the walk starts at the region with the most votes left,
- it always moves to the unvisited neighbor (of the last region on the stack)
  with the most votes left, and backtracks when there is none,
- as soon as the collected votes reach `votesPerMarker`, one marker is placed at
  the centroid of the merged shape of the collected regions. The extra votes are
  carried over, and the last region starts the next pool.

When all the regions are visited, any votes left that are not enough for one more
marker are dropped. Ties are always broken in favor of the region that comes first
in the input, so the output only depends on the input.

The adjacency graph of every group must be connected. Otherwise the walk cannot
reach some regions, and the program stops with the list of these regions.

## Placement point

- for a polygon, the centroid of the area of its outer ring
- for a multi-polygon, the middle of the bounding box of all its parts. This is
  not guaranteed to fall inside one of the parts.

All the shapes are checked before any marker is placed: a region with another
kind of shape, or a polygon without area, stops the program even if that region
would not get a marker.

## Input formats

`dotmarkers` joins three JSON files by region id.

### geometry

A GeoJSON `FeatureCollection`. Only `Polygon` and `MultiPolygon` features can be
placed. The `id` of each feature may be a number or a string.

```text
{"type": "FeatureCollection", "features": [
  {"type": "Feature", "id": "32003", "properties": {},
   "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]}}
]}
```

### votes

An object indexed by region id. The group is read from the `state` property
(see `groupProperty` below), and each candidate's votes from the property named
after the candidate.

```text
{"32003": {"state": "Nevada", "clinton": 402227, "trump": 320057}}
```

Features without an entry in this file are skipped.

### neighbors

An object indexed by region id:

```text
{"32003": {"neighbors": ["32017", "32023"]}}
```

A region without an entry has no neighbors.

## Configuration

```text
{
  "outputSettings": {"contestName": "2016 presidential election", "outputFile": "markers.json"},
  "sources": {
    "geometryFile": "counties.json",
    "votesFile": "election.json",
    "neighborsFile": "neighbors.json",
    "groupProperty": "state"
  },
  "candidates": [{"name": "clinton", "label": "Hillary Clinton"}, {"name": "trump"}],
  "rules": {"votesPerMarker": 10000}
}
```

The paths are relative to the directory of the configuration file. All the
options may be overriden on the command line.

## Output

A JSON summary with the list of markers, the statistics by group and candidate,
and a fingerprint of the list of markers (identical across runs with the same
input).

Each marker is written as:

```text
{"candidateId": "clinton", "regionIds": ["32003", "32017"], "x": -115.0, "y": 36.2, "kind": "pooled"}
```

 */
