// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;

pub const DEFAULT_LANG: &str = "es";

// Tabelas de mensagens embutidas no binário
const BUNDLES: &[(&str, &str)] = &[
    ("es", include_str!("../../locales/es.json")),
    ("en", include_str!("../../locales/en.json")),
];

/// Catálogo de mensagens voltadas ao usuário, por idioma.
#[derive(Clone, Debug)]
pub struct I18nStore {
    messages: Arc<HashMap<String, HashMap<String, String>>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut messages = HashMap::new();
        for (lang, raw) in BUNDLES {
            let table: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("arquivo de mensagens inválido: {lang}"))?;
            messages.insert(lang.to_string(), table);
        }
        Ok(Self { messages: Arc::new(messages) })
    }

    /// Busca a mensagem no idioma pedido, cai para o padrão e, por último, devolve a chave.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        let template = self
            .messages
            .get(lang)
            .and_then(|table| table.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|table| table.get(key)))
            .map(String::as_str)
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |msg, (name, value)| {
            msg.replace(&format!("{{{name}}}"), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let es = store.messages.get("es").unwrap();
        for (lang, table) in store.messages.iter() {
            for key in es.keys() {
                assert!(table.contains_key(key), "{lang} não tem a chave {key}");
            }
        }
    }

    #[test]
    fn substitutes_placeholders_and_falls_back() {
        let store = I18nStore::load().unwrap();
        let msg = store.translate("en", "insufficient_stock", &[("product", "Arroz")]);
        assert!(msg.contains("Arroz"));
        let fallback = store.translate("fr", "empty_cart", &[]);
        assert_eq!(fallback, store.translate("es", "empty_cart", &[]));
        assert_eq!(store.translate("es", "no_such_key", &[]), "no_such_key");
    }
}
