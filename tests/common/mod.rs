#![allow(dead_code)]

use events_core::models::EventPayload;

pub fn event_payload(title: &str) -> EventPayload {
    EventPayload {
        title: Some(title.to_string()),
        description: Some("Two days of talks about systems programming".to_string()),
        overview: Some("Talks, workshops and a hallway track".to_string()),
        image: Some("/images/event.png".to_string()),
        venue: Some("Moscone Center".to_string()),
        location: Some("San Francisco, CA".to_string()),
        date: Some("2025-11-07".to_string()),
        time: Some("9:00".to_string()),
        mode: Some("Offline".to_string()),
        audience: Some("Developers".to_string()),
        agenda: Some(vec!["Registration".to_string(), "Keynote".to_string()]),
        organizer: Some("Dev Events".to_string()),
        tags: Some(vec!["systems".to_string(), "rust".to_string()]),
    }
}
