use clap::Parser;

/// This program places the markers of a "one dot per N votes" election map.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON configuration of the map: where to find the data, the candidates and the
    /// number of votes per marker. Relative paths in this file are read from its directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing a summary in JSON format. If provided, dotmarkers will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The GeoJSON feature collection with the shapes of the regions. Overrides the configuration.
    #[clap(short, long, value_parser)]
    pub geometry: Option<String>,

    /// (file path) The JSON object of the vote counts, indexed by region id. Overrides the configuration.
    #[clap(long, value_parser)]
    pub votes: Option<String>,

    /// (file path) The JSON object of the neighbors, indexed by region id. Overrides the configuration.
    #[clap(short, long, value_parser)]
    pub neighbors: Option<String>,

    /// (list of comma-separated values or not specified) If specified, the candidates to place markers for. Each
    /// name is the property holding the votes of that candidate in the vote records.
    #[clap(long, value_parser, value_delimiter = ',')]
    pub candidates: Option<Vec<String>>,

    /// (positive integer) The number of votes that one marker stands for. Overrides the configuration.
    #[clap(long, value_parser)]
    pub votes_per_marker: Option<u64>,

    /// (default state) The property of the vote records holding the group of each region.
    #[clap(long, value_parser)]
    pub group_property: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
