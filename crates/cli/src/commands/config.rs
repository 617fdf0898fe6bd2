use std::env;
use std::fs;
use std::path::Path;

use toml::Value;
use wellora_core::config::{discover_config_file, AppConfig, LoadOptions, Setting};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let file_path = discover_config_file();
    let file_doc = file_path.as_deref().and_then(load_config_file_doc);

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for setting in config.settings() {
        let source = setting_source(&setting, file_doc.as_ref(), file_path.as_deref());
        lines.push(format!("- {} = {} (source: {source})", setting.key, setting.value));
    }

    lines.join("\n")
}

fn load_config_file_doc(path: &Path) -> Option<Value> {
    fs::read_to_string(path).ok()?.parse::<Value>().ok()
}

fn setting_source(setting: &Setting, file_doc: Option<&Value>, file_path: Option<&Path>) -> String {
    let env_var = std::iter::once(setting.env_var)
        .chain(setting.alias)
        .find(|var| env::var_os(var).is_some());
    if let Some(var) = env_var {
        return format!("env ({var})");
    }

    match (file_doc, file_path) {
        (Some(doc), Some(path)) if contains_path(doc, setting.key) => {
            format!("file ({})", path.display())
        }
        _ => "default".to_string(),
    }
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    key_path.split('.').try_fold(root, |current, key| current.get(key)).is_some()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use wellora_core::config::Setting;

    use super::{contains_path, setting_source};

    #[test]
    fn nested_keys_are_found_in_config_file() {
        let doc: toml::Value =
            "[catalog]\nhair_path = \"custom/hair.json\"\n".parse().expect("toml");
        assert!(contains_path(&doc, "catalog.hair_path"));
        assert!(!contains_path(&doc, "catalog.skincare_path"));
        assert!(!contains_path(&doc, "server.bind_address"));
    }

    #[test]
    fn file_keys_are_attributed_to_the_file() {
        let doc: toml::Value =
            "[catalog]\npregnancy_guide_path = \"guides/p.json\"\n".parse().expect("toml");
        let setting = |key| Setting {
            key,
            env_var: "WELLORA_UNSET_FOR_CONFIG_SOURCE_TEST",
            alias: None,
            value: String::new(),
        };
        let path = Path::new("wellora.toml");

        assert_eq!(
            setting_source(&setting("catalog.pregnancy_guide_path"), Some(&doc), Some(path)),
            "file (wellora.toml)"
        );
        assert_eq!(setting_source(&setting("catalog.hair_path"), Some(&doc), Some(path)), "default");
        assert_eq!(setting_source(&setting("catalog.hair_path"), None, None), "default");
    }
}
