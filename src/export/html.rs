use crate::model::SummaryArtifact;

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;max-width:720px;margin:2rem auto;line-height:1.5}h1{font-size:1.6rem}";

/// Standalone HTML page with the title as `<h1>` and bullets as a `<ul>`
pub(super) fn render(artifact: &SummaryArtifact) -> String {
    let title = escape(&artifact.title);

    let mut out = String::with_capacity(256 + artifact.bullet_points.len() * 64);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", title));
    out.push_str(&format!("<style>{}</style>\n", STYLE));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h1>{}</h1>\n<ul>\n", title));
    for point in &artifact.bullet_points {
        out.push_str(&format!("<li>{}</li>\n", escape(point)));
    }
    out.push_str("</ul>\n</body>\n</html>\n");
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
