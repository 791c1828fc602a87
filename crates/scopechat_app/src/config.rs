//! Startup configuration from environment variables and the group seed file.

use std::path::{Path, PathBuf};

use chat_logging::chat_warn;
use scopechat_core::GroupSeed;
use scopechat_engine::DEFAULT_MODEL;
use serde::Deserialize;

const GROUPS_FILENAME: &str = "groups.ron";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Missing key is not fatal; the session runs in a degraded mode where
    /// queries are refused with a notice.
    pub api_key: Option<String>,
    pub model: String,
    pub output_dir: PathBuf,
    pub groups: Vec<GroupSeed>,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    groups: Vec<SeedGroup>,
}

#[derive(Debug, Deserialize)]
struct SeedGroup {
    id: String,
    name: String,
    #[serde(default)]
    urls: Vec<String>,
}

pub fn load() -> AppConfig {
    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());
    let model = std::env::var("SCOPECHAT_MODEL")
        .ok()
        .filter(|model| !model.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let output_dir = std::env::var("SCOPECHAT_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./output"));

    let groups_path = PathBuf::from(GROUPS_FILENAME);
    AppConfig {
        api_key,
        model,
        output_dir,
        groups: load_groups(&groups_path),
    }
}

/// Reads the seed groups from a RON file, falling back to built-in defaults
/// when the file is missing or unreadable.
fn load_groups(path: &Path) -> Vec<GroupSeed> {
    let content = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return default_groups();
        }
        Err(err) => {
            chat_warn!("Failed to read group seed file {:?}: {}", path, err);
            return default_groups();
        }
    };

    match parse_seed_file(&content) {
        Ok(groups) if !groups.is_empty() => groups,
        Ok(_) => {
            chat_warn!("Group seed file {:?} contains no groups", path);
            default_groups()
        }
        Err(err) => {
            chat_warn!("Failed to parse group seed file {:?}: {}", path, err);
            default_groups()
        }
    }
}

fn parse_seed_file(content: &str) -> Result<Vec<GroupSeed>, ron::error::SpannedError> {
    let file: SeedFile = ron::from_str(content)?;
    Ok(file
        .groups
        .into_iter()
        .map(|group| GroupSeed {
            id: group.id,
            name: group.name,
            urls: group.urls,
        })
        .collect())
}

fn default_groups() -> Vec<GroupSeed> {
    vec![
        GroupSeed {
            id: "rust-book".to_string(),
            name: "The Rust Book".to_string(),
            urls: vec!["https://doc.rust-lang.org/book/".to_string()],
        },
        GroupSeed {
            id: "scratch".to_string(),
            name: "Scratch".to_string(),
            urls: Vec::new(),
        },
    ]
}
