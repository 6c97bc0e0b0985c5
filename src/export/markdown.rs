use crate::model::SummaryArtifact;

/// `# title`, a blank line, then one `- point` line per bullet
pub(super) fn render(artifact: &SummaryArtifact) -> String {
    let mut out = format!("# {}\n\n", artifact.title);
    for point in &artifact.bullet_points {
        out.push_str("- ");
        out.push_str(point);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::artifact;

    #[test]
    fn test_layout() {
        let a = artifact("Demo", &["Alpha", "Beta"]);
        assert_eq!(render(&a), "# Demo\n\n- Alpha\n- Beta\n");
    }

    #[test]
    fn test_bullets_recoverable() {
        let points = ["First point", "Second: with *markup*", "Third - dashed"];
        let a = artifact("Demo", &points);

        let rendered = render(&a);
        let recovered: Vec<&str> = rendered
            .lines()
            .filter_map(|line| line.strip_prefix("- "))
            .collect();

        assert_eq!(recovered, points);
    }
}
