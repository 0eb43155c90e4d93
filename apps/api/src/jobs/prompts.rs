// Prompt for job enrichment. Keep the JSON contract in sync with
// `enrichment::RawEnrichment`.

pub struct EnrichPromptFields<'a> {
    pub title_en: &'a str,
    pub title_ar: &'a str,
    pub description_en: &'a str,
    pub description_ar: &'a str,
    pub category: &'a str,
    pub skills: &'a str,
}

/// Field values are inserted once, as-is; braces inside them are never expanded.
pub fn enrich_prompt(fields: &EnrichPromptFields<'_>) -> String {
    let EnrichPromptFields {
        title_en,
        title_ar,
        description_en,
        description_ar,
        category,
        skills,
    } = fields;

    format!(
        r#"You are a job analysis AI. Given a job posting, extract:
1. "tags": An array of 5-15 relevant lowercase skill/keyword tags
2. "summary_en": A concise 1-2 sentence summary in English
3. "summary_ar": A concise 1-2 sentence summary in Arabic

Job Title (EN): {title_en}
Job Title (AR): {title_ar}
Description (EN): {description_en}
Description (AR): {description_ar}
Category: {category}
Skills: {skills}

Respond with ONLY valid JSON: {{"tags": [...], "summary_en": "...", "summary_ar": "..."}}"#
    )
}
