/// Colours and fonts for exported documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTheme {
    pub text: String,
    pub background: String,
    pub muted: String,
    pub border: String,
    pub link: String,
    pub code_background: String,
    pub font_body: String,
    pub font_mono: String,
}

impl Default for ExportTheme {
    fn default() -> Self {
        Self {
            text: "#1f2328".to_string(),
            background: "#ffffff".to_string(),
            muted: "#59636e".to_string(),
            border: "#d1d9e0".to_string(),
            link: "#0969da".to_string(),
            code_background: "#f6f8fa".to_string(),
            font_body: "-apple-system, BlinkMacSystemFont, \"Segoe UI\", Helvetica, Arial, sans-serif"
                .to_string(),
            font_mono: "ui-monospace, SFMono-Regular, Menlo, Consolas, monospace".to_string(),
        }
    }
}

/// Stylesheet embedded in exported HTML.
pub fn generate_export_css(theme: &ExportTheme) -> String {
    format!(
        r#":root {{
    --color-text: {text};
    --color-base: {background};
    --color-muted: {muted};
    --color-border: {border};
    --color-link: {link};
    --color-code: {code_background};
    --font-body: {font_body};
    --font-mono: {font_mono};
}}

body {{
    margin: 0;
    background: var(--color-base);
    color: var(--color-text);
    font-family: var(--font-body);
    line-height: 1.6;
}}

.markdown-body {{
    box-sizing: border-box;
    max-width: 980px;
    margin: 0 auto;
    padding: 45px;
}}

.markdown-body h1, .markdown-body h2 {{
    padding-bottom: 0.3em;
    border-bottom: 1px solid var(--color-border);
}}

/* Links */
.markdown-body a {{
    color: var(--color-link);
    text-decoration: none;
}}

.markdown-body a:hover {{
    text-decoration: underline;
}}

/* Code */
.markdown-body code {{
    font-family: var(--font-mono);
    font-size: 85%;
    padding: 0.2em 0.4em;
    background: var(--color-code);
    border-radius: 6px;
}}

.markdown-body pre {{
    padding: 16px;
    overflow: auto;
    background: var(--color-code);
    border-radius: 6px;
}}

.markdown-body pre code {{
    padding: 0;
    background: transparent;
    font-size: 100%;
}}

/* Tables */
.markdown-body table {{
    border-collapse: collapse;
    border-spacing: 0;
    display: block;
    overflow: auto;
}}

.markdown-body th, .markdown-body td {{
    padding: 6px 13px;
    border: 1px solid var(--color-border);
}}

.markdown-body tr:nth-child(2n) {{
    background: var(--color-code);
}}

/* Blockquotes */
.markdown-body blockquote {{
    margin: 0;
    padding: 0 1em;
    color: var(--color-muted);
    border-left: 0.25em solid var(--color-border);
}}

.markdown-body img {{
    max-width: 100%;
}}
"#,
        text = theme.text,
        background = theme.background,
        muted = theme.muted,
        border = theme.border,
        link = theme.link,
        code_background = theme.code_background,
        font_body = theme.font_body,
        font_mono = theme.font_mono,
    )
}
