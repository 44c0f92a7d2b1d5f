use crate::models::CulturalContextRequest;

pub const CULTURAL_PORTRAIT: &str = include_str!("../data/prompts/cultural_portrait.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Single pass over the template: substituted values are never rescanned, and
/// unknown placeholders are left as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            result.push_str(&rest[start..]);
            return result;
        };

        let key = &after_open[..end];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    result.push_str(rest);
    result
}

/// Render the instruction sent to the text-generation service.
///
/// Fields are embedded verbatim.
pub fn cultural_portrait(request: &CulturalContextRequest) -> String {
    let age = request.age().to_string();
    let gender = request.gender().to_string();
    let description = if request.description().is_empty() {
        String::new()
    } else {
        format!("Additional details: {}", request.description())
    };

    render(
        CULTURAL_PORTRAIT,
        &[
            ("age", &age),
            ("gender", &gender),
            ("country", request.country()),
            ("occasion", request.occasion()),
            ("description", &description),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    #[test]
    fn test_render_single_var() {
        assert_eq!(
            render("Hello {{name}}!", &[("name", "world")]),
            "Hello world!"
        );
    }

    #[test]
    fn test_render_multiple_vars() {
        assert_eq!(
            render("{{a}} and {{b}}", &[("a", "cats"), ("b", "dogs")]),
            "cats and dogs"
        );
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        assert_eq!(
            render("{{a}} then {{b}}", &[("a", "{{b}}"), ("b", "x")]),
            "{{b}} then x"
        );
    }

    #[test]
    fn test_render_keeps_unknown_and_unclosed_placeholders() {
        assert_eq!(
            render("{{missing}} and {{a}} {{open", &[("a", "1")]),
            "{{missing}} and 1 {{open"
        );
    }

    #[test]
    fn test_template_has_placeholders() {
        for key in ["age", "gender", "country", "occasion", "description"] {
            assert!(CULTURAL_PORTRAIT.contains(&format!("{{{{{}}}}}", key)));
        }
    }

    #[test]
    fn test_cultural_portrait_embeds_fields() {
        let request = CulturalContextRequest::new(
            "Japan",
            "Wedding",
            25,
            Gender::Male,
            "holding a folding fan",
        )
        .unwrap();

        let prompt = cultural_portrait(&request);
        assert!(prompt.contains("25 year old Male in Japan for a Wedding"));
        assert!(prompt.contains("Additional details: holding a folding fan"));
        assert!(prompt.contains("facial expression"));
        assert!(prompt.contains("Output only the prompt text"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_cultural_portrait_omits_empty_description() {
        let request =
            CulturalContextRequest::new("Ghana", "Festival", 60, Gender::NonBinary, "").unwrap();

        let prompt = cultural_portrait(&request);
        assert!(prompt.contains("60 year old Non-binary in Ghana"));
        assert!(!prompt.contains("Additional details"));
    }

    #[test]
    fn test_cultural_portrait_does_not_escape_input() {
        let request =
            CulturalContextRequest::new("\"Peru\"", "{{occasion}}", 30, Gender::Female, "")
                .unwrap();

        let prompt = cultural_portrait(&request);
        assert!(prompt.contains("in \"Peru\""));
        assert!(prompt.contains("for a {{occasion}}"));
    }

    #[test]
    fn test_cultural_portrait_keeps_placeholder_text_in_fields() {
        let request = CulturalContextRequest::new(
            "{{occasion}}land",
            "{{description}} party",
            25,
            Gender::Male,
            "note {{country}}",
        )
        .unwrap();

        let prompt = cultural_portrait(&request);
        assert!(prompt.contains("25 year old Male in {{occasion}}land for a {{description}} party"));
        assert!(prompt.contains("Additional details: note {{country}}"));
    }
}
