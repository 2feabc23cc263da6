use std::path::PathBuf;
use std::time::Duration;

use chunkfetch::{ClientSettings, DEFAULT_CHUNK_SIZE, DEFAULT_CONCURRENCY, DownloadOptions, DownloadRequest};
use clap::{ArgAction, Parser};
use url::Url;

#[derive(Clone, Debug, Parser)]
#[command(name = "chunkfetch", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct App {
    /// http(s) URL of the resource to download
    pub url: String,

    /// Bytes per ranged request
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: u64,

    /// Ranged requests in flight at once
    #[arg(short = 'j', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Where chunk parts and the result are written
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// Proxy URL; https:// proxies carry https traffic, others http
    #[arg(long = "proxy", value_name = "URL")]
    pub proxies: Vec<Url>,

    /// Connect timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Extra request header, as `Name: value`
    #[arg(short = 'H', long = "header", value_name = "HEADER", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// More log output, repeatable
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("header name is empty".to_string());
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl App {
    /// Default filter directive when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "chunkfetch=info,warn",
            (false, 2) => "chunkfetch=debug,info",
            _ => "trace",
        }
    }

    pub fn request(&self) -> chunkfetch::Result<DownloadRequest> {
        DownloadRequest::with_chunk_size(&self.url, self.chunk_size)
    }

    pub fn options(&self) -> DownloadOptions {
        let mut options = DownloadOptions::default().concurrency(self.concurrency);
        if let Some(dir) = &self.scratch_dir {
            options = options.scratch_dir(dir);
        }
        for (name, value) in &self.headers {
            options = options.header(name, value);
        }
        options
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            proxies:         self.proxies.clone(),
            connect_timeout: self.connect_timeout.map(Duration::from_secs),
            user_agent:      Some(format!("chunkfetch/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> App {
        App::try_parse_from(std::iter::once("chunkfetch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let app = parse(&["https://example.com/a.zip"]);
        assert_eq!(app.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(app.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(app.log_directive(), "warn");
        assert!(app.request().is_ok());
    }

    #[test]
    fn test_flags_map_onto_options() {
        let app = parse(&[
            "https://example.com/a.zip",
            "--chunk-size",
            "1024",
            "-j",
            "2",
            "--scratch-dir",
            "/tmp/cf",
            "-H",
            "Authorization: Bearer x",
            "--proxy",
            "https://proxy.local:8443",
            "--connect-timeout",
            "7",
            "-vv",
        ]);

        let options = app.options();
        assert_eq!(options.concurrency, 2);
        assert_eq!(options.scratch_dir, PathBuf::from("/tmp/cf"));
        assert_eq!(&options.headers[..], &[("Authorization".to_string(), "Bearer x".to_string())]);

        let settings = app.client_settings();
        assert_eq!(settings.proxies.len(), 1);
        assert_eq!(settings.connect_timeout, Some(Duration::from_secs(7)));

        assert_eq!(app.request().unwrap().chunk_size(), 1024);
        assert_eq!(app.log_directive(), "chunkfetch=debug,info");
    }

    #[test]
    fn test_rejects_malformed_header() {
        let result = App::try_parse_from(["chunkfetch", "https://example.com", "-H", "no-colon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        let result = App::try_parse_from(["chunkfetch", "https://example.com", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_http_url_is_rejected_before_download() {
        let app = parse(&["ftp://example.com/a.zip"]);
        assert!(matches!(app.request(), Err(chunkfetch::Error::UnsupportedScheme(_))));
    }
}
