//! Candidate upstream URL construction.

use crate::config::UpstreamConfig;

/// Build the ordered list of candidate video URLs for one episode.
///
/// One URL per configured mount, in mount order. Path parameters are
/// percent-encoded; the upstream hosts episodes as `{mount}/{id}/{ep}.mp4`.
pub fn candidate_urls(upstream: &UpstreamConfig, media_id: &str, episode: &str) -> Vec<String> {
    upstream
        .video_mounts
        .iter()
        .map(|mount| {
            format!(
                "{}/{}/{}.mp4",
                mount.trim_end_matches('/'),
                urlencoding::encode(media_id),
                urlencoding::encode(episode)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(mounts: &[&str]) -> UpstreamConfig {
        UpstreamConfig {
            video_mounts: mounts.iter().map(|m| m.to_string()).collect(),
            ..UpstreamConfig::default()
        }
    }

    #[test]
    fn builds_one_url_per_mount_in_order() {
        let urls = candidate_urls(
            &upstream(&["https://host/Video", "https://host/Video2"]),
            "11649",
            "1",
        );
        assert_eq!(
            urls,
            vec![
                "https://host/Video/11649/1.mp4",
                "https://host/Video2/11649/1.mp4",
            ]
        );
    }

    #[test]
    fn encodes_path_parameters() {
        let urls = candidate_urls(&upstream(&["https://host/Video"]), "a b", "2/special");
        assert_eq!(urls, vec!["https://host/Video/a%20b/2%2Fspecial.mp4"]);
    }

    #[test]
    fn tolerates_trailing_slash_on_mount() {
        let urls = candidate_urls(&upstream(&["https://host/Video/"]), "7", "3");
        assert_eq!(urls, vec!["https://host/Video/7/3.mp4"]);
    }
}
