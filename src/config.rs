use std::{env, net::SocketAddr, path::PathBuf};
use crate::error::{config, AppErr};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub addr:       SocketAddr,
    pub static_dir: PathBuf,
}

impl Config {
    /// 讀 .env + 環境變數
    pub fn from_env() -> Result<Self, AppErr> {
        dotenvy::dotenv().ok();
        Self::from_vars(|k| env::var(k).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppErr> {
        let host = get("CHAT_ADDR").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("PORT") {
            Some(p) => p.trim().parse::<u16>().map_err(|e| config(format!("PORT={p}: {e}")))?,
            None    => DEFAULT_PORT,
        };
        let addr = format!("{host}:{port}")
            .parse()
            .map_err(|e| config(format!("CHAT_ADDR={host}: {e}")))?;
        let static_dir = get("STATIC_DIR").unwrap_or_else(|| "static".into()).into();

        Ok(Self { addr, static_dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, AppErr> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_vars(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn overrides() {
        let cfg = load(&[("CHAT_ADDR", "127.0.0.1"), ("PORT", "8081"), ("STATIC_DIR", "public")]).unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:8081".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn bad_port_is_a_config_error() {
        assert!(matches!(load(&[("PORT", "http")]), Err(AppErr::Config(_))));
    }
}
