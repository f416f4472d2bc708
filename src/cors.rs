use actix_cors::Cors;
use actix_web::http::{header, uri::Uri};
use log::{error, info, warn};
use std::{
    env as stdenv,
    fs::File,
    io::{BufRead, BufReader, Error as IOError, ErrorKind},
    path::Path,
};

pub const CORS_FILE: &str = ".env_cors";

pub fn check_env_cors() {
    let current_dir = stdenv::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    let env_cors_path = current_dir.join(CORS_FILE);

    if env_cors_path.exists() {
        info!("{} file found at: {}", CORS_FILE, env_cors_path.display());
    } else {
        error!(
            "{} file not found. Expected it at: {}",
            CORS_FILE,
            env_cors_path.display()
        );
    }
}

/// One origin per line. Blank lines are skipped, unparseable ones are warned
/// about; a file where nothing parses is an error.
pub fn load_and_validate_cors_origins(path: &str) -> Result<Vec<String>, IOError> {
    let file = File::open(path)?;
    let buf_reader = BufReader::new(file);
    let mut origins = Vec::new();
    let mut invalid = 0usize;

    for line in buf_reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Uri>() {
            Ok(_) => origins.push(line.to_string()),
            Err(e) => {
                invalid += 1;
                warn!("Invalid URI in CORS configuration: {}", e);
            }
        }
    }

    if origins.is_empty() && invalid > 0 {
        return Err(IOError::new(
            ErrorKind::InvalidData,
            "All CORS lines failed validation.",
        ));
    }

    Ok(origins)
}

pub fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
