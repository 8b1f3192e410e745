//! Embed snippet generation
//!
//! Pure string templating parameterized by the widget public key. The
//! widget script is served from `//code.tidio.co/{public_key}.js`.

use std::fmt;
use std::str::FromStr;

/// Protocol-relative base the widget script loads from.
pub const WIDGET_SCRIPT_BASE: &str = "//code.tidio.co";

/// Accepted public key length range for the heuristic check.
pub const PUBLIC_KEY_MIN_LEN: usize = 10;
pub const PUBLIC_KEY_MAX_LEN: usize = 50;

/// How the generated snippet loads the widget script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmbedMode {
    /// Deferred injection after page load (default).
    #[default]
    Async,
    /// Single inline script tag.
    Sync,
}

impl FromStr for EmbedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "async" => Ok(Self::Async),
            "sync" => Ok(Self::Sync),
            other => Err(format!(
                "unknown embed mode \"{other}\", expected \"async\" or \"sync\""
            )),
        }
    }
}

impl fmt::Display for EmbedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Async => f.write_str("async"),
            Self::Sync => f.write_str("sync"),
        }
    }
}

/// Render the HTML snippet that loads the chat widget.
pub fn embed_snippet(public_key: &str, mode: EmbedMode) -> String {
    match mode {
        EmbedMode::Async => format!(
            r#"<script>
  document.tidioChatCode = "{public_key}";
  (function () {{
    function loadTidio() {{
      var script = document.createElement("script");
      script.src = "{WIDGET_SCRIPT_BASE}/{public_key}.js";
      script.async = true;
      document.head.appendChild(script);
    }}
    if (document.readyState === "complete") {{
      loadTidio();
    }} else {{
      window.addEventListener("load", loadTidio);
    }}
  }})();
</script>"#
        ),
        EmbedMode::Sync => {
            format!(r#"<script src="{WIDGET_SCRIPT_BASE}/{public_key}.js" async></script>"#)
        }
    }
}

/// Preconnect hint emitted next to the snippet so the widget host is
/// resolved before the script tag is reached.
pub fn preconnect_hint() -> String {
    format!(r#"<link rel="preconnect" href="https:{WIDGET_SCRIPT_BASE}">"#)
}

/// Heuristic public key check: alphanumeric, 10-50 characters.
///
/// Returns a warning message on mismatch. Generation proceeds either
/// way; the vendor is the only authority on what keys are real.
pub fn validate_public_key(public_key: &str) -> Option<String> {
    if !public_key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Some(format!(
            "public key \"{public_key}\" contains non-alphanumeric characters"
        ));
    }
    let len = public_key.chars().count();
    if len < PUBLIC_KEY_MIN_LEN {
        return Some(format!(
            "public key looks too short ({len} characters, expected {PUBLIC_KEY_MIN_LEN}-{PUBLIC_KEY_MAX_LEN})"
        ));
    }
    if len > PUBLIC_KEY_MAX_LEN {
        return Some(format!(
            "public key looks too long ({len} characters, expected {PUBLIC_KEY_MIN_LEN}-{PUBLIC_KEY_MAX_LEN})"
        ));
    }
    None
}
