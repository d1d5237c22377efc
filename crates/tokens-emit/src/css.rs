//! CSS custom-property emitter (`tokens.css`).

use crate::resolved::ResolvedToken;

/// Render one `:root` block with a declaration per token, in list order.
///
/// Values are written verbatim. Schema validation has already rejected any
/// literal containing `;`, `{`, `}` or a control character.
pub fn render_css(tokens: &[ResolvedToken]) -> String {
    let mut out = String::from(":root {\n");
    for token in tokens {
        out.push_str(&format!("  {}: {};\n", token.css_var, token.value));
    }
    out.push_str("}\n");
    out
}
