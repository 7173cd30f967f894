use serde::Serialize;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter as JsonFormatter, Serializer};
use std::io;

/// Title of the panel tab.
pub const PANEL_TITLE: &str = "Copy Markdown";

/// Where a host debugger places a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    /// Above the host's own panels.
    Top,
    /// Below the host's own panels.
    Bottom,
}

/// Panel handed to a host debugger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    /// Tab title.
    pub title: String,
    /// HTML content.
    pub body_html: String,
    /// Position among the host's panels.
    pub placement: Placement,
}

/// Wrap a Markdown report in a panel with a button copying it to the clipboard.
///
/// ```
/// let panel = exception_markdown::render_panel("# Error\n</script>");
/// assert!(panel.body_html.contains("\\u003C/script\\u003E"));
/// assert!(!panel.body_html.contains("# Error\n</script>"));
/// ```
pub fn render_panel(markdown: &str) -> Panel {
    Panel {
        title: PANEL_TITLE.into(),
        body_html: format!(
            "{}{}<script>\nvar ExceptionMarkdown = {{\n    markdown: {},\n{}</script>\n",
            STYLES,
            BUTTON,
            script_string_literal(markdown),
            SCRIPT_METHODS
        ),
        placement: Placement::Bottom,
    }
}

/// JSON string literal that is safe to embed in a `<script>` element: `<`, `>`, `&`, `'` and
/// `"` inside the string are written as `\u00XX` escapes.
pub(crate) fn script_string_literal(text: &str) -> String {
    let mut literal = Vec::with_capacity(text.len() + 2);
    let mut serializer = Serializer::with_formatter(&mut literal, HexEscapeFormatter);
    match text.serialize(&mut serializer) {
        Ok(()) => String::from_utf8_lossy(&literal).into_owned(),
        // Writing into a Vec can't fail.
        Err(_) => "\"\"".into(),
    }
}

struct HexEscapeFormatter;

impl JsonFormatter for HexEscapeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            if matches!(c, '<' | '>' | '&' | '\'') {
                writer.write_all(fragment[start..index].as_bytes())?;
                write!(writer, "\\u{:04X}", c as u32)?;
                start = index + c.len_utf8();
            }
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match char_escape {
            CharEscape::Quote => writer.write_all(b"\\u0022"),
            other => CompactFormatter.write_char_escape(writer, other),
        }
    }
}

const STYLES: &str = r#"<style>
.exception-markdown-copy-btn {
    position: fixed !important;
    top: 10px;
    right: 10px;
    z-index: 30001;
    display: inline-flex;
    align-items: center;
    gap: 6px;
    padding: 8px 16px;
    background: linear-gradient(135deg, #4a5568 0%, #2d3748 100%);
    color: #fff !important;
    border: none;
    border-radius: 6px;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    font-size: 13px;
    font-weight: 500;
    cursor: pointer;
    transition: all 0.2s ease;
    box-shadow: 0 2px 4px rgba(0,0,0,0.1);
}
.exception-markdown-copy-btn:hover {
    background: linear-gradient(135deg, #5a6578 0%, #3d4758 100%);
    box-shadow: 0 4px 8px rgba(0,0,0,0.15);
    transform: translateY(-1px);
}
.exception-markdown-copy-btn svg {
    width: 16px;
    height: 16px;
    fill: currentColor;
}
.exception-markdown-copy-btn.copied {
    background: linear-gradient(135deg, #48bb78 0%, #38a169 100%);
}
.exception-markdown-copy-btn.copied .copy-icon,
.exception-markdown-copy-btn .check-icon {
    display: none;
}
.exception-markdown-copy-btn.copied .check-icon {
    display: inline-block;
}
</style>
"#;

const BUTTON: &str = r#"<button class="exception-markdown-copy-btn" onclick="ExceptionMarkdown.copy()" title="Copy error report as Markdown">
    <svg class="copy-icon" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg">
        <path d="M16 1H4c-1.1 0-2 .9-2 2v14h2V3h12V1zm3 4H8c-1.1 0-2 .9-2 2v14c0 1.1.9 2 2 2h11c1.1 0 2-.9 2-2V7c0-1.1-.9-2-2-2zm0 16H8V7h11v14z"/>
    </svg>
    <svg class="check-icon" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg">
        <path d="M9 16.17L4.83 12l-1.42 1.41L9 19 21 7l-1.41-1.41z"/>
    </svg>
    <span class="btn-text">Copy Markdown</span>
</button>
"#;

const SCRIPT_METHODS: &str = r#"
    copy: function() {
        var btn = document.querySelector('.exception-markdown-copy-btn');
        var btnText = btn.querySelector('.btn-text');

        if (navigator.clipboard && window.isSecureContext) {
            navigator.clipboard.writeText(this.markdown).then(function() {
                ExceptionMarkdown.showResult(btn, btnText, true);
            }).catch(function() {
                ExceptionMarkdown.fallbackCopy(btn, btnText);
            });
        } else {
            this.fallbackCopy(btn, btnText);
        }
    },

    fallbackCopy: function(btn, btnText) {
        var textarea = document.createElement('textarea');
        textarea.value = this.markdown;
        textarea.style.position = 'fixed';
        textarea.style.left = '-9999px';
        document.body.appendChild(textarea);
        textarea.select();

        try {
            document.execCommand('copy');
            this.showResult(btn, btnText, true);
        } catch (e) {
            this.showResult(btn, btnText, false);
        }

        document.body.removeChild(textarea);
    },

    showResult: function(btn, btnText, copied) {
        if (copied) {
            btn.classList.add('copied');
        }
        btnText.textContent = copied ? 'Copied!' : 'Failed!';

        setTimeout(function() {
            btn.classList.remove('copied');
            btnText.textContent = 'Copy Markdown';
        }, 2000);
    }
};
"#;
