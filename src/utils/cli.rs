use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Args {
    /// Server listening host
    #[arg(long, env = "STUDYHALL_HOST", default_value = "127.0.0.1")]
    pub(crate) host: String,

    /// Server listening port
    #[arg(short, long, env = "STUDYHALL_PORT", default_value_t = 5000)]
    pub(crate) port: u16,

    /// Database connection string
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://studyhall.db"
    )]
    pub(crate) database_url: String,
}
