use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("translation failed: {0}")]
pub struct TranslateError(pub String);

/// Pluggable machine-translation strategy used by "Auto Translate".
pub trait Translator {
    fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

impl<F> Translator for F
where
    F: Fn(&str) -> Result<String, TranslateError>,
{
    fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_tr_001_closure_is_a_translator() {
        let upper = |text: &str| Ok::<_, TranslateError>(text.to_uppercase());
        assert_eq!(upper.translate("hello").as_deref(), Ok("HELLO"));

        let failing = |_: &str| Err::<String, _>(TranslateError("offline".to_string()));
        assert_eq!(
            failing.translate("hello").unwrap_err().to_string(),
            "translation failed: offline"
        );
    }
}
