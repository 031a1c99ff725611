use crate::cli::ConfigAction;
use crate::error::CliError;
use crate::settings::SettingKey;
use crate::settings::SettingsProvider;

pub async fn config(settings: &SettingsProvider, action: ConfigAction) -> Result<(), CliError> {
    match action {
        ConfigAction::Set { key, value } => {
            let key: SettingKey = key.parse()?;
            settings.set_text(&key, &value).await?;
            println!("{key} updated");
        }
        ConfigAction::Get { key } => {
            let key: SettingKey = key.parse()?;
            match settings.get_text(&key).await? {
                Some(value) => println!("{value}"),
                None => println!("{key} is not set"),
            }
        }
        ConfigAction::Unset { key } => {
            let key: SettingKey = key.parse()?;
            if settings.unset(&key).await? {
                println!("{key} removed");
            } else {
                println!("{key} was not set");
            }
        }
        ConfigAction::List => {
            for key in settings.keys().await? {
                let value = settings.get_text(&key).await?.unwrap_or_default();
                println!("{key} = {value}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemoryBackend;

    #[tokio::test]
    async fn test_config_set_then_unset() {
        let settings = SettingsProvider::new(MemoryBackend::new());

        config(
            &settings,
            ConfigAction::Set {
                key: "table.streams.page_size".to_string(),
                value: "100".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            settings.get::<usize>(&SettingKey::page_size("streams")).await.unwrap(),
            Some(100)
        );

        config(
            &settings,
            ConfigAction::Unset {
                key: "table.streams.page_size".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(settings.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_config_rejects_unknown_keys() {
        let settings = SettingsProvider::new(MemoryBackend::new());
        let result = config(
            &settings,
            ConfigAction::Get {
                key: "server.password".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Settings(_))));
    }
}
