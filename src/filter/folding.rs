//! Arabic letter-variant folding for search terms.

use serde::{Deserialize, Serialize};

/// How interchangeable Arabic letter forms are treated in search terms.
///
/// Folding runs on already-escaped terms, just before they are joined into a
/// pattern, so a character class it emits is never escaped again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArabicFolding {
    /// Terms are used exactly as typed.
    #[default]
    Passthrough,
    /// Alef, taa marbuta / haa and yaa / alef maqsura variants match each other.
    LetterClasses,
}

const ALEF_CLASS: &str = "[اأإآ]";
const HAA_CLASS: &str = "[ةه]";
const YAA_CLASS: &str = "[يى]";

impl ArabicFolding {
    /// Fold one escaped term.
    pub fn fold(self, term: &str) -> String {
        match self {
            ArabicFolding::Passthrough => term.to_string(),
            ArabicFolding::LetterClasses => {
                let mut out = String::with_capacity(term.len() * 2);
                for ch in term.chars() {
                    match ch {
                        'ا' | 'أ' | 'إ' | 'آ' => out.push_str(ALEF_CLASS),
                        'ة' | 'ه' => out.push_str(HAA_CLASS),
                        'ي' | 'ى' => out.push_str(YAA_CLASS),
                        other => out.push(other),
                    }
                }
                out
            }
        }
    }
}
