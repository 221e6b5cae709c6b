//! Aruba prompt patterns.
//!
//! Controllers wrap the hostname in parentheses and put a space before the
//! prompt character: `(Stupid-Preferred-Master) #`. ClearPass uses square
//! brackets: `[clearpass.example]#`.

use crate::error::PatternError;
use crate::platform::PromptPattern;

/// Aruba controller / instant AP prompt.
pub fn controller() -> Result<PromptPattern, PatternError> {
    PromptPattern::new(
        "aruba",
        r"\(([\w\-/]+)\)\s+[#>]\s*$",
        r"(.*)\(%s\).*(>|#)\s*",
    )
}

/// Aruba ClearPass prompt.
pub fn clearpass() -> Result<PromptPattern, PatternError> {
    PromptPattern::new(
        "arubaclearpass",
        r"\[([\w@.\-/]+)\][#>]\s*$",
        r"(.*)\[%s\].*(>|#)\s*",
    )
}
