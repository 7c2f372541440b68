//! # Translation Catalog
//!
//! A [`Translator`] over nested JSON catalogs, one per locale. A dotted key such as
//! `cockpit.users` selects an object inside the catalog; its string leaves form the
//! returned bundle. The English and German catalogs are compiled in.

use async_trait::async_trait;
use list_framework::{ListError, Locale, TranslationBundle, Translator};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog for {locale} is not valid JSON: {source}")]
    Parse {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct StaticCatalog {
    catalogs: BTreeMap<String, Value>,
}

impl StaticCatalog {
    /// The catalogs shipped with the application.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_sources(&[
            ("en", include_str!("../i18n/en.json")),
            ("de", include_str!("../i18n/de.json")),
        ])
    }

    pub fn from_sources(sources: &[(&str, &str)]) -> Result<Self, CatalogError> {
        let mut catalogs = BTreeMap::new();
        for (locale, source) in sources {
            let value = serde_json::from_str(source).map_err(|source| CatalogError::Parse {
                locale: locale.to_string(),
                source,
            })?;
            catalogs.insert(locale.to_string(), value);
        }
        Ok(Self { catalogs })
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }
}

#[async_trait]
impl Translator for StaticCatalog {
    async fn translate(&self, key: &str, locale: &Locale) -> Result<TranslationBundle, ListError> {
        let catalog = self
            .catalogs
            .get(locale.code())
            .ok_or_else(|| ListError::NotFound(format!("catalog {locale}")))?;

        let scope = key
            .split('.')
            .try_fold(catalog, |value, segment| value.get(segment));

        // A missing scope is not an error: every label falls back to its key.
        let bundle = match scope {
            Some(Value::Object(entries)) => entries
                .iter()
                .filter_map(|(name, text)| text.as_str().map(|text| (name.clone(), text.to_string())))
                .collect(),
            _ => TranslationBundle::new(),
        };
        Ok(bundle)
    }
}
