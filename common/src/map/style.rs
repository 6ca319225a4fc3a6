//! 마커 표시 변형 (기본/선택)
//!
//! 선택이 바뀔 때마다 HTML을 다시 만들지 않도록 마커 생성 시 두 변형을 미리 만든다.

pub const DEFAULT_COLOR: &str = "#ef4444";
pub const SELECTED_COLOR: &str = "#f59e0b";

pub const DEFAULT_Z_INDEX: i32 = 1;
pub const SELECTED_Z_INDEX: i32 = 10;

const SELECTED_ATTR: &str = "data-variant=\"selected\"";

/// 미리 계산된 마커 HTML 두 벌
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerVariants {
    pub default: String,
    pub selected: String,
}

impl MarkerVariants {
    /// `number`는 목록에서의 1부터 시작하는 순번
    pub fn new(number: usize, name: &str) -> Self {
        let label = format!("{}. {}", number, escape_html(name));
        Self {
            default: render(&label, DEFAULT_COLOR, 14, "default"),
            selected: render(&label, SELECTED_COLOR, 16, "selected"),
        }
    }
}

/// 선택 변형으로 렌더링된 HTML인지
pub fn is_selected_content(content: &str) -> bool {
    content.contains(SELECTED_ATTR)
}

fn render(label: &str, color: &str, font_px: u32, variant: &str) -> String {
    format!(
        concat!(
            r#"<div class="bakery-marker" data-variant="{variant}" style="position:relative;cursor:pointer;">"#,
            r#"<div style="background-color:{color};color:white;padding:8px 12px;border-radius:20px;"#,
            r#"font-weight:bold;box-shadow:0 2px 4px rgba(0,0,0,0.2);font-size:{font}px;white-space:nowrap;">{label}</div>"#,
            r#"<div style="position:absolute;bottom:-6px;left:50%;transform:translateX(-50%);width:0;height:0;"#,
            r#"border-left:6px solid transparent;border-right:6px solid transparent;border-top:6px solid {color};"></div>"#,
            r#"</div>"#,
        ),
        variant = variant,
        color = color,
        font = font_px,
        label = label,
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_differ_in_color_and_size() {
        let v = MarkerVariants::new(1, "르뱅드마리");
        assert!(v.default.contains(DEFAULT_COLOR));
        assert!(v.default.contains("font-size:14px"));
        assert!(v.selected.contains(SELECTED_COLOR));
        assert!(v.selected.contains("font-size:16px"));
        assert!(v.default.contains("1. 르뱅드마리"));
    }

    #[test]
    fn test_is_selected_content() {
        let v = MarkerVariants::new(2, "빵굽는날");
        assert!(is_selected_content(&v.selected));
        assert!(!is_selected_content(&v.default));
    }

    #[test]
    fn test_name_is_escaped() {
        let v = MarkerVariants::new(3, "<b>빵&커피</b>");
        assert!(v.default.contains("3. &lt;b&gt;빵&amp;커피&lt;/b&gt;"));
        assert!(!v.default.contains("<b>"));
    }
}
