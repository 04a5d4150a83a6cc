//! Outbound contact links for a lead's phone number.

/// Dial-out link for the OS dialer.
pub fn dial_link(phone: &str) -> String {
    format!("tel:{phone}")
}

/// WhatsApp deep link. Non-digit characters are stripped from the
/// phone number; a non-empty message is percent-encoded into the
/// `text` query parameter.
pub fn whatsapp_link(phone: &str, message: Option<&str>) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match message {
        Some(text) if !text.is_empty() => {
            format!("https://wa.me/{digits}?text={}", urlencoding::encode(text))
        }
        _ => format!("https://wa.me/{digits}"),
    }
}

/// Prefilled follow-up message referencing the lead by name and area.
pub fn follow_up_message(full_name: &str, area: &str) -> String {
    format!("Hi {full_name}, I'm following up regarding the property in {area}.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whatsapp_link_strips_formatting() {
        assert_eq!(
            whatsapp_link("+1 (555) 010-9999", None),
            "https://wa.me/15550109999"
        );
    }

    #[test]
    fn whatsapp_link_encodes_message() {
        let link = whatsapp_link("5550109999", Some("Hi Dana, are we still on?"));
        assert_eq!(
            link,
            "https://wa.me/5550109999?text=Hi%20Dana%2C%20are%20we%20still%20on%3F"
        );
    }

    #[test]
    fn empty_message_omits_query() {
        assert_eq!(whatsapp_link("5550109999", Some("")), "https://wa.me/5550109999");
    }

    #[test]
    fn dial_link_keeps_the_number_as_entered() {
        assert_eq!(dial_link("+1 555 010 9999"), "tel:+1 555 010 9999");
    }
}
