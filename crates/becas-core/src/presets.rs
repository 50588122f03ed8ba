//! Predefined stage names, section templates and icons offered by the console.

use serde::Serialize;

/// A ready-made section: name, glyph and content type slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTemplate {
    pub name: &'static str,
    pub icon: &'static str,
    pub content_type: &'static str,
}

const fn template(
    name: &'static str,
    icon: &'static str,
    content_type: &'static str,
) -> SectionTemplate {
    SectionTemplate {
        name,
        icon,
        content_type,
    }
}

/// Common stage names suggested when creating a stage.
pub const STAGE_NAMES: [&str; 5] = [
    "Etapa de Preselección",
    "Etapa de Selección",
    "Etapa de Adjudicación",
    "Etapa de Matrícula",
    "Etapa de Seguimiento",
];

/// Section templates suggested when creating a section.
pub static SECTION_TEMPLATES: [SectionTemplate; 10] = [
    template("Requisitos de Postulación", "📄", "requisitos"),
    template("Procedimiento de Postulación", "📋", "procedimiento"),
    template("Cronograma", "📅", "cronograma"),
    template("IES Elegibles", "🏛️", "ies"),
    template("Criterios de Puntaje", "📊", "criterios"),
    template("Documentación Adicional", "📎", "documentos"),
    template("Información General", "ℹ️", "informacion"),
    template("Preguntas Frecuentes", "❓", "faq"),
    template("Resultados", "🏆", "resultados"),
    template("Recursos", "📚", "recursos"),
];

/// How many leading templates a selection stage is seeded with.
pub const SEEDED_SECTION_COUNT: usize = 5;

/// Sections appended by a one-click seed of a selection stage.
#[must_use]
pub fn seeded_sections() -> &'static [SectionTemplate] {
    &SECTION_TEMPLATES[..SEEDED_SECTION_COUNT]
}

/// Icon palette offered by the section form.
pub const COMMON_ICONS: [&str; 20] = [
    "📄", "📋", "📅", "🏛️", "📊", "📎", "ℹ️", "❓", "🏆", "📚", "🎯", "💡", "⚡", "🔔", "📌", "📝",
    "📈", "🎓", "💼", "🌟",
];

/// Content type whose sections list requirement items in the viewer.
pub const REQUIREMENTS_CONTENT_TYPE: &str = "requisitos";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_starts_with_requirements() {
        let seeded = seeded_sections();
        assert_eq!(seeded.len(), 5);
        assert_eq!(seeded[0].content_type, REQUIREMENTS_CONTENT_TYPE);
        assert_eq!(seeded[4].content_type, "criterios");
    }
}
