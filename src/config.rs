#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_url: String,
    pub jwt_secret: String,
    pub jwt_lifetime_secs: i64,
}
