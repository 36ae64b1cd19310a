use clap::Parser;

#[derive(Parser)]
#[command(name = "scribe", version = version(), about = "Terminal form filler")]
pub struct Cli {
    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 60.0)]
    pub frame_rate: f64,
}

pub fn version() -> String {
    let author = clap::crate_authors!();

    let config_dir_path = crate::config::get_config_dir().display().to_string();
    let data_dir_path = crate::config::get_data_dir().display().to_string();

    format!(
        "\
{}

Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}",
        clap::crate_version!()
    )
}
