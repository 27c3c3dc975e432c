//! Listing → Telegram HTML rendering, with locale variants.
//!
//! Formatting is pure and synchronous: no I/O, no failure for any valid
//! listing. The two locale layouts are separate strategy implementations
//! behind one trait, selected at startup.

use crate::listing::{Listing, OfferType};

/// Right-to-left mark prefixed to every non-empty Arabic line so mixed
/// Latin/Arabic content (numbers, URLs) keeps correct reading order.
pub const RTL_MARK: char = '\u{200F}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Locale {
    English,
    Arabic,
}

/// Renders a listing into Telegram HTML.
pub trait ListingFormatter: Send + Sync {
    fn format(&self, listing: &Listing) -> String;
}

/// Build the formatter for a locale.
pub fn formatter_for(locale: Locale, max_description: usize) -> Box<dyn ListingFormatter> {
    match locale {
        Locale::English => Box::new(EnglishFormatter { max_description }),
        Locale::Arabic => Box::new(ArabicFormatter { max_description }),
    }
}

const OFFER_LABELS_EN: [(&str, &str); 3] = [
    ("SELL", "For Sale"),
    ("RENT", "For Rent"),
    ("CHALET", "Chalet"),
];

const OFFER_LABELS_AR: [(&str, &str); 3] = [
    ("SELL", "للبيع"),
    ("RENT", "للإيجار"),
    ("CHALET", "شاليه"),
];

const CURRENCY_AR: [(&str, &str); 2] = [("IQD", "د.ع"), ("USD", "$")];

/// Explicit label lookup; unrecognized offers render their raw string.
fn offer_label<'a>(table: &'a [(&str, &str)], offer: &'a OfferType) -> &'a str {
    table
        .iter()
        .find(|(key, _)| *key == offer.as_str())
        .map(|(_, label)| *label)
        .unwrap_or_else(|| offer.as_str())
}

/// Escape markup-significant characters in user-supplied free text before
/// embedding it in Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Comma-grouped integer rendering, used for prices and areas.
fn group_thousands(value: f64) -> String {
    let digits = (value.max(0.0).round() as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Truncate to at most `max_chars` characters, cutting at the last
/// whitespace before the limit, and append an ellipsis marker. Text under
/// the limit is returned unchanged. A prefix with no whitespace at all
/// falls back to a hard cut.
fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let prefix: String = text.chars().take(max_chars).collect();
    let cut = match prefix.rfind(char::is_whitespace) {
        Some(idx) => prefix[..idx].trim_end().to_string(),
        None => prefix,
    };
    format!("{cut}...")
}

/// Whole metres print without a decimal point.
fn fmt_metres(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn location_line(listing: &Listing, separator: &str) -> String {
    let mut location = format!("{}{separator}{}", listing.city_name, listing.district_name);
    if listing.subdistrict_name != listing.district_name {
        location.push_str(separator);
        location.push_str(&listing.subdistrict_name);
    }
    location
}

/// Default left-to-right layout.
pub struct EnglishFormatter {
    pub max_description: usize,
}

impl EnglishFormatter {
    fn price_line(&self, listing: &Listing) -> String {
        if listing.price <= 0.0 {
            return "Price on request".to_string();
        }
        format!("{} {}", group_thousands(listing.price), listing.currency)
    }
}

impl ListingFormatter for EnglishFormatter {
    fn format(&self, listing: &Listing) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("<b>{}</b>", escape_html(&listing.title)));
        lines.push(String::new());

        lines.push(location_line(listing, ", "));
        lines.push(format!("{} m²", group_thousands(listing.area)));
        if let Some(n) = listing.bedrooms {
            lines.push(format!("Bedrooms: {n}"));
        }
        if let Some(n) = listing.bathrooms {
            lines.push(format!("Bathrooms: {n}"));
        }
        if let Some(n) = listing.floors {
            lines.push(format!("Floors: {n}"));
        }
        if let Some(n) = listing.age {
            lines.push(format!("Age: {n} years"));
        }
        if let (Some(w), Some(d)) = (listing.frontage_width, listing.frontage_depth) {
            lines.push(format!("Frontage: {}×{} m", fmt_metres(w), fmt_metres(d)));
        }
        lines.push(self.price_line(listing));

        if let Some(description) = &listing.description {
            lines.push(String::new());
            lines.push(truncate_at_word(
                &escape_html(description),
                self.max_description,
            ));
        }

        lines.push(String::new());
        lines.push(format!("{} - {}", listing.category, listing.subcategory));
        lines.push(offer_label(&OFFER_LABELS_EN, &listing.offer_type).to_string());
        if let Some(phone) = &listing.phone {
            lines.push(format!("Tel: {phone}"));
        }

        lines.push(String::new());
        lines.push(format!(r#"<a href="{}">View Details</a>"#, listing.url));

        lines.join("\n")
    }
}

/// Right-to-left Arabic layout with its own iconography and label tables.
pub struct ArabicFormatter {
    pub max_description: usize,
}

impl ArabicFormatter {
    fn price_line(&self, listing: &Listing) -> String {
        if listing.price <= 0.0 {
            return "💰 <b>السعر عند الطلب</b>".to_string();
        }
        let currency = CURRENCY_AR
            .iter()
            .find(|(code, _)| *code == listing.currency)
            .map(|(_, symbol)| *symbol)
            .unwrap_or(listing.currency.as_str());
        format!("💰 <b>{} {}</b>", group_thousands(listing.price), currency)
    }
}

impl ListingFormatter for ArabicFormatter {
    fn format(&self, listing: &Listing) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!(
            "<b>【 {} 】</b>",
            offer_label(&OFFER_LABELS_AR, &listing.offer_type)
        ));
        lines.push(format!("🏠 <b>{}</b>", escape_html(&listing.title)));
        lines.push(String::new());

        lines.push(format!("📍 {}", location_line(listing, "، ")));
        lines.push(String::new());

        lines.push(self.price_line(listing));
        lines.push(String::new());

        lines.push(format!("📐 المساحة: {} م²", group_thousands(listing.area)));
        if let Some(n) = listing.bedrooms {
            lines.push(format!("🛏 غرف النوم: {n}"));
        }
        if let Some(n) = listing.bathrooms {
            lines.push(format!("🚿 الحمامات: {n}"));
        }
        if let Some(n) = listing.floors {
            lines.push(format!("🏢 الطوابق: {n}"));
        }
        if let Some(n) = listing.age {
            lines.push(format!("📅 العمر: {n} سنة"));
        }
        if let (Some(w), Some(d)) = (listing.frontage_width, listing.frontage_depth) {
            lines.push(format!("📏 الواجهة: {}×{} م", fmt_metres(w), fmt_metres(d)));
        }
        lines.push(String::new());

        lines.push(format!("🏷 {} - {}", listing.category, listing.subcategory));

        if let Some(description) = &listing.description {
            lines.push(String::new());
            lines.push(format!(
                "📝 {}",
                truncate_at_word(&escape_html(description), self.max_description)
            ));
        }

        if let Some(phone) = &listing.phone {
            lines.push(String::new());
            lines.push(format!("📞 للتواصل: {phone}"));
        }

        lines.push(String::new());
        lines.push(format!(
            r#"🔗 <a href="{}">عرض التفاصيل في التطبيق</a>"#,
            listing.url
        ));

        lines
            .into_iter()
            .map(|line| {
                if line.is_empty() {
                    line
                } else {
                    format!("{RTL_MARK}{line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        Listing {
            id: "abc123".to_string(),
            title: "Modern Apartment".to_string(),
            description: Some("Spacious apartment with a view".to_string()),
            price: 150_000_000.0,
            currency: "IQD".to_string(),
            area: 180.5,
            city_id: 1,
            city_name: "Baghdad".to_string(),
            district_name: "Al-Mansour".to_string(),
            subdistrict_name: "Al-Jamia".to_string(),
            category: "Residential".to_string(),
            subcategory: "Apartment".to_string(),
            images: vec![],
            offer_type: OfferType::Sell,
            phone: Some("+964123456789".to_string()),
            url: "https://example.com/r/abc123".to_string(),
            bedrooms: Some(3),
            bathrooms: Some(2),
            floors: None,
            age: None,
            frontage_width: None,
            frontage_depth: None,
        }
    }

    #[test]
    fn groups_thousands_with_commas() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_000.0), "1,000");
        assert_eq!(group_thousands(150_000_000.0), "150,000,000");
        assert_eq!(group_thousands(180.5), "181");
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_html("a & b <c>"), "a &amp; b &lt;c&gt;");
    }

    #[test]
    fn title_markup_is_escaped_in_both_locales() {
        let mut l = listing();
        l.title = "Deal <b>now</b> & save".to_string();
        for locale in [Locale::English, Locale::Arabic] {
            let out = formatter_for(locale, 200).format(&l);
            assert!(!out.contains("<b>now</b>"));
            assert!(out.contains("&lt;b&gt;now&lt;/b&gt; &amp; save"));
        }
    }

    #[test]
    fn truncates_at_word_boundary_with_ellipsis() {
        let text = "word ".repeat(60); // 300 chars
        let out = truncate_at_word(&text, 200);
        assert!(out.ends_with("..."));
        assert!(out.trim_end_matches("...").chars().count() <= 200);
        assert!(out.trim_end_matches("...").ends_with("word"));
    }

    #[test]
    fn short_text_is_not_truncated() {
        assert_eq!(truncate_at_word("short text", 200), "short text");
    }

    #[test]
    fn truncation_without_whitespace_falls_back_to_hard_cut() {
        let text = "x".repeat(250);
        let out = truncate_at_word(&text, 200);
        assert_eq!(out.chars().count(), 203);
    }

    #[test]
    fn long_description_is_truncated_in_output() {
        let mut l = listing();
        l.description = Some("lorem ipsum ".repeat(40)); // 480 chars
        let out = formatter_for(Locale::English, 200).format(&l);
        let desc_line = out
            .lines()
            .find(|line| line.starts_with("lorem"))
            .expect("description line");
        assert!(desc_line.ends_with("..."));
        assert!(desc_line.chars().count() <= 203);
    }

    #[test]
    fn zero_price_renders_placeholder_not_number() {
        let mut l = listing();
        l.price = 0.0;

        let en = formatter_for(Locale::English, 200).format(&l);
        assert!(en.contains("Price on request"));
        assert!(!en.contains("0 IQD"));

        let ar = formatter_for(Locale::Arabic, 200).format(&l);
        assert!(ar.contains("السعر عند الطلب"));
        assert!(!ar.contains("0 د.ع"));
    }

    #[test]
    fn negative_price_renders_placeholder() {
        let mut l = listing();
        l.price = -5.0;
        let out = formatter_for(Locale::English, 200).format(&l);
        assert!(out.contains("Price on request"));
    }

    #[test]
    fn positive_price_is_grouped_with_currency() {
        let en = formatter_for(Locale::English, 200).format(&listing());
        assert!(en.contains("150,000,000 IQD"));

        let ar = formatter_for(Locale::Arabic, 200).format(&listing());
        assert!(ar.contains("150,000,000 د.ع"));
    }

    #[test]
    fn unknown_currency_passes_through_in_arabic() {
        let mut l = listing();
        l.currency = "EUR".to_string();
        let out = formatter_for(Locale::Arabic, 200).format(&l);
        assert!(out.contains("150,000,000 EUR"));
    }

    #[test]
    fn offer_labels_use_locale_tables() {
        let mut l = listing();
        l.offer_type = OfferType::Rent;
        assert!(formatter_for(Locale::English, 200).format(&l).contains("For Rent"));
        assert!(formatter_for(Locale::Arabic, 200).format(&l).contains("للإيجار"));
    }

    #[test]
    fn unknown_offer_type_renders_raw_string() {
        let mut l = listing();
        l.offer_type = OfferType::Other("AUCTION".to_string());
        for locale in [Locale::English, Locale::Arabic] {
            assert!(formatter_for(locale, 200).format(&l).contains("AUCTION"));
        }
    }

    #[test]
    fn optional_fields_emit_no_line_when_absent() {
        let mut l = listing();
        l.description = None;
        l.phone = None;
        l.bedrooms = None;
        l.bathrooms = None;
        let out = formatter_for(Locale::English, 200).format(&l);
        assert!(!out.contains("Tel:"));
        assert!(!out.contains("Bedrooms:"));
        assert!(!out.contains("Bathrooms:"));
    }

    #[test]
    fn frontage_needs_both_dimensions() {
        let mut l = listing();
        l.frontage_width = Some(10.0);
        l.frontage_depth = None;
        let out = formatter_for(Locale::English, 200).format(&l);
        assert!(!out.contains("Frontage"));

        l.frontage_depth = Some(20.5);
        let out = formatter_for(Locale::English, 200).format(&l);
        assert!(out.contains("Frontage: 10×20.5 m"));
    }

    #[test]
    fn subdistrict_equal_to_district_is_not_repeated() {
        let mut l = listing();
        l.subdistrict_name = l.district_name.clone();
        let out = formatter_for(Locale::English, 200).format(&l);
        assert_eq!(out.matches("Al-Mansour").count(), 1);
    }

    #[test]
    fn arabic_lines_carry_rtl_mark_except_empty_ones() {
        let out = formatter_for(Locale::Arabic, 200).format(&listing());
        let mut saw_empty = false;
        for line in out.lines() {
            if line.is_empty() {
                saw_empty = true;
            } else {
                assert!(
                    line.starts_with(RTL_MARK),
                    "line without RTL mark: {line:?}"
                );
            }
        }
        assert!(saw_empty, "expected blank separator lines");
    }

    #[test]
    fn english_lines_carry_no_rtl_mark() {
        let out = formatter_for(Locale::English, 200).format(&listing());
        assert!(!out.contains(RTL_MARK));
    }

    #[test]
    fn deep_link_is_rendered_as_anchor() {
        let en = formatter_for(Locale::English, 200).format(&listing());
        assert!(en.contains(r#"<a href="https://example.com/r/abc123">View Details</a>"#));

        let ar = formatter_for(Locale::Arabic, 200).format(&listing());
        assert!(ar.contains(r#"<a href="https://example.com/r/abc123">عرض التفاصيل في التطبيق</a>"#));
    }
}
