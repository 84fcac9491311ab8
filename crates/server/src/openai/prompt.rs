//! The fixed prompt used for every description rewrite.
//!
//! Tone, language and output format are part of the product, not
//! configuration. So are the sampling parameters. The prompt is written in
//! Turkish, the language the descriptions are published in.

use super::types::ChatMessage;

/// Sampling temperature for every rewrite.
pub const TEMPERATURE: f32 = 0.7;

/// Output length cap for every rewrite.
pub const MAX_TOKENS: u32 = 800;

/// System instruction: persona, goals, language, and HTML output format.
pub const SYSTEM_INSTRUCTION: &str = "Sen profesyonel bir e-ticaret ürün açıklaması yazarısın. \
Verilen ürün açıklamalarını daha çekici, SEO uyumlu ve satış odaklı hale getir. \
Türkçe yaz. \
HTML formatında yanıt ver (p, ul, li, strong etiketlerini kullan).";

/// Stand-in used when a product has no description yet.
pub const MISSING_DESCRIPTION: &str = "Açıklama yok";

/// Build the two messages for one rewrite.
#[must_use]
pub fn messages(title: &str, current_description: Option<&str>) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_INSTRUCTION),
        ChatMessage::user(user_message(title, current_description)),
    ]
}

fn user_message(title: &str, current_description: Option<&str>) -> String {
    let current = current_description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(MISSING_DESCRIPTION);

    format!(
        "Ürün: {title}\n\n\
         Mevcut Açıklama: {current}\n\n\
         Bu açıklamayı iyileştir ve daha detaylı, çekici hale getir."
    )
}
