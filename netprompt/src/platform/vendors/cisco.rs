//! Cisco prompt patterns.
//!
//! Sample prompts:
//!
//! | Platform | Prompt |
//! |---|---|
//! | IOS | `KHONEMDCRRR01#` |
//! | IOS-XE | `KHONEMDCRWA02#` |
//! | IOS-XR | `RP/0/RSP0/CPU0:KHONEMDCRWA01#` |
//! | NX-OS | `KHONEMDCSWC01_ADMIN#` |
//! | ASA | `khonedmzrfw01/pri/act/901-IN#` |

use crate::error::PatternError;
use crate::platform::PromptPattern;

/// IOS-XR prompt, identified by its route-processor prefix.
pub fn iosxr() -> Result<PromptPattern, PatternError> {
    PromptPattern::new(
        "ciscoxr",
        r"RP/0/RSP0/CPU0:([\w\-]+)(.*)[#>]\s*$",
        r"(.*)RP/0/RSP0/CPU0:%s.*(>|#)\s*",
    )
}

/// Generic trailing `#`/`>` prompt.
///
/// Never matches a line containing a `:` anywhere, which keeps it off
/// IOS-XR prompts and `Password:`-style lines. This is narrower than a
/// colon check that only looks past the start of the hostname: a
/// timestamped line such as `12:01:33 router#` yields no candidate here.
pub fn generic() -> Result<PromptPattern, PatternError> {
    PromptPattern::new(
        "cisco",
        r"^[^:]*?([\w\-/]+)[#>]\s*$",
        r"(.*)%s.*(>|#)\s*",
    )
}
