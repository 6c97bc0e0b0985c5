use crate::model::SummaryArtifact;
use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, SpecialIndentType, Start, Style, StyleType,
};
use std::io::Cursor;

const HEADING_STYLE: &str = "Heading1";
const BULLET_NUMBERING: usize = 1;

/// One `Heading1` paragraph, then one bullet-list paragraph per point
pub(super) fn render(artifact: &SummaryArtifact) -> Result<Vec<u8>, String> {
    let bullets = AbstractNumbering::new(BULLET_NUMBERING).add_level(
        Level::new(
            0,
            Start::new(1),
            NumberFormat::new("bullet"),
            LevelText::new("\u{2022}"),
            LevelJc::new("left"),
        )
        .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None),
    );

    let mut docx = Docx::new()
        .add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("Heading 1")
                .size(36)
                .bold(),
        )
        .add_abstract_numbering(bullets)
        .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING))
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(&artifact.title))
                .style(HEADING_STYLE),
        );

    for point in &artifact.bullet_points {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(point))
                .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0)),
        );
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| format!("Failed to package DOCX: {}", e))?;

    Ok(buf.into_inner())
}
