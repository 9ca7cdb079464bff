use crate::{
    core::{config::MarkerSyncConfig, constants::VIEWER_MARKER_ID, geo::LatLng},
    profile::Profile,
};
use serde::{Deserialize, Serialize};

/// Everything a map surface needs to draw one profile marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMarker {
    pub profile_id: String,
    pub position: LatLng,
    /// Display name, already HTML-escaped
    pub label: String,
    pub image_url: String,
    pub border_color: String,
    pub moving: bool,
}

impl ProfileMarker {
    pub fn for_profile(profile: &Profile, position: LatLng, config: &MarkerSyncConfig) -> Self {
        let image_url = profile
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(&config.placeholder_image)
            .to_string();
        let border_color = if profile.is_online() {
            config.online_color.clone()
        } else {
            config.offline_color.clone()
        };

        Self {
            profile_id: profile.id.clone(),
            position,
            label: escape_html(&profile.display_name),
            image_url,
            border_color,
            moving: profile.is_moving,
        }
    }

    /// The "You are here" marker for the viewer's own position
    pub fn viewer(position: LatLng, config: &MarkerSyncConfig) -> Self {
        Self {
            profile_id: VIEWER_MARKER_ID.to_string(),
            position,
            label: "You are here".to_string(),
            image_url: config.placeholder_image.clone(),
            border_color: config.viewer_color.clone(),
            moving: false,
        }
    }
}

/// Escapes the five characters significant in HTML text and attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Emma"), "Emma");
        assert_eq!(
            escape_html(r#"<img src=x onerror="a&b">'"#),
            "&lt;img src=x onerror=&quot;a&amp;b&quot;&gt;&#39;"
        );
    }

    #[test]
    fn test_marker_from_profile() {
        let config = MarkerSyncConfig::default();
        let position = LatLng::new(-1.29, 36.82);

        let online = Profile::new("1", "<b>Ann</b>")
            .with_online(true)
            .with_image("https://example.com/a.jpg");
        let marker = ProfileMarker::for_profile(&online, position, &config);
        assert_eq!(marker.label, "&lt;b&gt;Ann&lt;/b&gt;");
        assert_eq!(marker.border_color, config.online_color);
        assert_eq!(marker.image_url, "https://example.com/a.jpg");
        assert_eq!(marker.position, position);

        let offline = Profile::new("2", "Bo").with_image("   ");
        let marker = ProfileMarker::for_profile(&offline, position, &config);
        assert_eq!(marker.border_color, config.offline_color);
        assert_eq!(marker.image_url, config.placeholder_image);
        assert!(!marker.moving);
    }

    #[test]
    fn test_viewer_marker() {
        let config = MarkerSyncConfig::default();
        let marker = ProfileMarker::viewer(LatLng::new(-1.3, 36.8), &config);
        assert_eq!(marker.profile_id, VIEWER_MARKER_ID);
        assert_eq!(marker.border_color, config.viewer_color);
        assert_eq!(marker.label, "You are here");
    }
}
