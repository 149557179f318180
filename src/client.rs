use std::collections::HashMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::errors::{NickError, Result};
use crate::feed::{FeedItem, parse_media_feed};
use crate::fetch::{Fetch, FetchRequest, HttpFetcher};
use crate::models::*;

const PLAYPLEX_PROMOLIST_URL: &str =
    "http://api.playplex.viacom.com/feeds/networkapp/intl/promolist/1.9";
const PLAYPLEX_PROMO_MGID: &str =
    "mgid:arc:promotion:nick.com:0cdfdb4d-ab75-45a4-9ee0-a5ec3205c248";
const PLAYPLEX_DISPATCH_URL: &str = "http://udat.mtvnservices.com/service1/dispatch.htm";
const PLAYPLEX_DISPATCH_FEED: &str = "nick_arc_player_prime";

const INTL_API_URL: &str = "https://apinickvimn-a.akamaihd.net/api/v2";
const INTL_BRAND: &str = "NickIntl";
const INTL_PLATFORM: &str = "App";
const INTL_EPISODE_URI_PREFIX: &str = "mgid:arc:episode:nickelodeonplay.com:";
const INTL_DEVICE: &str = "Android";

pub(crate) const ACCESS_URL: &str = "http://media.mtvnservices.com/pmt/e1/access/";
const ACCESS_REFERER_PREFIX: &str =
    "http://media.mtvnservices.com/player/api/mobile/androidNative/nick_play_app.live.Android.";

#[derive(Debug, Deserialize)]
struct PlayplexPage<T> {
    data: PlayplexData<T>,
}

#[derive(Debug, Deserialize)]
struct PlayplexData<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromoItem {
    #[serde(default)]
    entity_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    links: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PlayplexEpisode {
    #[serde(default)]
    title: String,
    mgid: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntlProperty {
    #[serde(default)]
    series_title: String,
    url_key: Option<String>,
    entity_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IntlGroups {
    #[serde(default)]
    results: Vec<IntlEpisode>,
}

#[derive(Debug, Deserialize)]
struct IntlEpisode {
    #[serde(default)]
    title: String,
    id: String,
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    config: AccessConfig,
}

/// first hop of the intl media lookup: templates for the item feed and mediagen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessConfig {
    /// item feed template with `{uri}` and `{lang}` placeholders.
    pub feed: String,
    /// mediagen template with `{uri}`, `{device}` and `{lang}` placeholders.
    #[serde(rename = "brightcove_mediagenRootURL")]
    pub mediagen_root: String,
}

#[derive(Debug, Deserialize)]
struct MediagenResponse {
    package: MediagenPackage,
}

#[derive(Debug, Deserialize)]
struct MediagenPackage {
    video: MediagenVideo,
}

#[derive(Debug, Deserialize)]
struct MediagenVideo {
    #[serde(default)]
    item: Vec<MediagenItem>,
}

#[derive(Debug, Deserialize)]
struct MediagenItem {
    #[serde(default)]
    rendition: Vec<MediagenRendition>,
    #[serde(default)]
    transcript: Vec<MediagenTranscript>,
}

#[derive(Debug, Deserialize)]
struct MediagenRendition {
    src: String,
}

#[derive(Debug, Deserialize)]
struct MediagenTranscript {
    #[serde(default)]
    typographic: Vec<Typographic>,
}

#[derive(Debug, Deserialize)]
struct Typographic {
    format: String,
    src: String,
}

/// browses the catalog of a region down to the playable items of an episode.
///
/// every call takes all the parameters it needs; the client keeps no session state.
pub struct NickClient<F = HttpFetcher> {
    fetcher: F,
}

impl<F: Fetch> NickClient<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    async fn get_json<T: DeserializeOwned>(&self, request: &FetchRequest) -> Result<T> {
        let text = self.fetcher.get_text(request).await?;
        decode_json(&text, &request.context)
    }

    async fn get_feed(&self, request: &FetchRequest) -> Result<Vec<FeedItem>> {
        let text = self.fetcher.get_text(request).await?;
        parse_media_feed(&text).map_err(|source| NickError::Xml {
            context: request.context.clone(),
            source,
        })
    }

    /// lists the series of a region, skipping entries that are not series.
    pub async fn list_series(&self, region: &Region) -> Result<Vec<Series>> {
        info!(region = %region.name, family = ?region.family, "listing series");

        let series: Vec<Series> = match region.family {
            CatalogFamily::Playplex => {
                let request = FetchRequest::new(
                    format!("{PLAYPLEX_PROMOLIST_URL}/{PLAYPLEX_PROMO_MGID}"),
                    "requesting playplex promo list",
                )
                .query("platform", "android")
                .query("brand", "nick")
                .query("version", "18.21.1")
                .query("region", "us")
                .query("key", "networkapp1.0");

                let page: PlayplexPage<PromoItem> = self.get_json(&request).await?;
                page.data
                    .items
                    .into_iter()
                    .filter(|item| item.entity_type == "series")
                    .map(|item| Series {
                        episodes: item
                            .links
                            .get("episode")
                            .and_then(serde_json::Value::as_str)
                            .map(|url| EpisodesLink::Feed(url.to_string())),
                        title: item.title,
                        region: region.clone(),
                    })
                    .collect()
            }
            CatalogFamily::Intl => {
                let request = intl_request(
                    "intl-editorial-content-categories/properties",
                    "requesting intl series properties",
                    region,
                )
                .query("overridelang", "true");

                let properties: Vec<IntlProperty> = self.get_json(&request).await?;
                properties
                    .into_iter()
                    .filter(|p| p.entity_type.as_deref().is_none_or(|t| t == "series"))
                    .map(|p| Series {
                        title: p.series_title,
                        region: region.clone(),
                        episodes: p.url_key.map(EpisodesLink::UrlKey),
                    })
                    .collect()
            }
        };

        debug!(count = series.len(), "series listed");
        Ok(series)
    }

    /// lists the episodes of a series.
    ///
    /// fails with [`NickError::NoEpisodesAvailable`] without any request when the
    /// series has no episode collection.
    pub async fn list_episodes(&self, series: &Series) -> Result<Vec<Episode>> {
        let Some(link) = &series.episodes else {
            return Err(NickError::NoEpisodesAvailable {
                series: series.title.clone(),
            });
        };

        info!(series = %series.title, "listing episodes");

        let episodes: Vec<Episode> = match link {
            EpisodesLink::Feed(url) => {
                let request = FetchRequest::new(url.as_str(), "requesting playplex episode feed");
                let page: PlayplexPage<PlayplexEpisode> = self.get_json(&request).await?;
                page.data
                    .items
                    .into_iter()
                    .map(|e| Episode {
                        title: e.title,
                        id: e.mgid,
                    })
                    .collect()
            }
            EpisodesLink::UrlKey(key) => {
                let request = intl_request(
                    "content-collection/config/groups",
                    "requesting intl episode groups",
                    &series.region,
                )
                .query("series", key.as_str())
                .query("types", "episode");

                let groups: IntlGroups = self.get_json(&request).await?;
                groups
                    .results
                    .into_iter()
                    .map(|e| Episode {
                        title: e.title,
                        id: e.id,
                    })
                    .collect()
            }
        };

        debug!(count = episodes.len(), "episodes listed");
        Ok(episodes)
    }

    /// resolves the playable items an episode fans out into.
    pub async fn media_items(&self, series: &Series, episode: &Episode) -> Result<Vec<MediaItem>> {
        info!(episode = %episode.title, "resolving media items");

        let items = match series.region.family {
            CatalogFamily::Playplex => {
                let request =
                    FetchRequest::new(PLAYPLEX_DISPATCH_URL, "requesting playplex media feed")
                        .query("feed", PLAYPLEX_DISPATCH_FEED)
                        .query("mgid", episode.id.as_str());

                self.get_feed(&request)
                    .await?
                    .into_iter()
                    .map(|item| playplex_media_item(item, episode))
                    .collect::<Result<Vec<_>>>()?
            }
            CatalogFamily::Intl => {
                let config = self.access_config(&series.region, episode).await?;
                let feed_url = intl_feed_url(&config, episode, &series.region);
                self.get_feed(&FetchRequest::new(feed_url, "requesting intl item feed"))
                    .await?
                    .into_iter()
                    .map(|item| intl_media_item(&config, item, episode, &series.region))
                    .collect::<Result<Vec<_>>>()?
            }
        };

        debug!(count = items.len(), "media items resolved");
        Ok(items)
    }

    /// looks up the access config of an intl episode.
    pub async fn access_config(&self, region: &Region, episode: &Episode) -> Result<AccessConfig> {
        let request = FetchRequest::new(ACCESS_URL, "requesting intl access config")
            .query("uri", intl_episode_uri(episode))
            .referer(format!("{ACCESS_REFERER_PREFIX}{}/", region.locale));

        let response: AccessResponse = self.get_json(&request).await?;
        debug!(feed = %response.config.feed, "access config resolved");
        Ok(response.config)
    }

    /// fetches the renditions and transcripts of one playable item.
    pub async fn media_descriptor(&self, item: &MediaItem) -> Result<MediaDescriptor> {
        let response: MediagenResponse = self.get_json(&item.mediagen).await?;
        let item = response
            .package
            .video
            .item
            .into_iter()
            .next()
            .ok_or_else(|| NickError::MissingField {
                context: item.mediagen.context.clone(),
                field: "package.video.item",
            })?;

        let sources = item.rendition.into_iter().map(|r| r.src).collect();
        let transcripts = item
            .transcript
            .into_iter()
            .flat_map(|t| t.typographic)
            .map(|t| TranscriptDescriptor {
                format: t.format,
                src: t.src,
            })
            .collect();

        Ok(MediaDescriptor {
            renditions: Renditions::from_sources(sources),
            transcripts,
        })
    }

    /// downloads the raw caption text of a descriptor, if it has an accepted one.
    pub async fn fetch_subtitle(&self, descriptor: &MediaDescriptor) -> Result<Option<String>> {
        let Some(caption) = descriptor.caption() else {
            return Ok(None);
        };

        debug!(src = %caption.src, "fetching caption");
        let request = FetchRequest::new(caption.src.as_str(), "requesting caption");
        Ok(Some(self.fetcher.get_text(&request).await?))
    }
}

fn decode_json<T: DeserializeOwned>(text: &str, context: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|source| NickError::Json {
        context: context.to_string(),
        source,
    })
}

fn intl_request(path: &str, context: &str, region: &Region) -> FetchRequest {
    FetchRequest::new(format!("{INTL_API_URL}/{path}"), context)
        .query("lang", region.lang.as_str())
        .query("locale", region.locale.as_str())
        .query("brand", INTL_BRAND)
        .query("platform", INTL_PLATFORM)
}

fn intl_episode_uri(episode: &Episode) -> String {
    format!("{INTL_EPISODE_URI_PREFIX}{}", episode.id)
}

/// fills `{name}` placeholders in one pass; unknown placeholders are left as
/// they are and substituted values are never scanned again.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        rest = &rest[open..];

        let Some(close) = rest.find('}') else {
            break;
        };
        let placeholder = &rest[..=close];
        match values.iter().find(|(name, _)| *name == &placeholder[1..close]) {
            Some((_, value)) => filled.push_str(value),
            None => filled.push_str(placeholder),
        }
        rest = &rest[close + 1..];
    }

    filled.push_str(rest);
    filled
}

fn intl_feed_url(config: &AccessConfig, episode: &Episode, region: &Region) -> String {
    fill_template(
        &config.feed,
        &[("uri", &intl_episode_uri(episode)), ("lang", &region.lang)],
    )
}

fn playplex_media_item(item: FeedItem, episode: &Episode) -> Result<MediaItem> {
    let url = item.content_url.ok_or_else(|| NickError::MissingField {
        context: "reading playplex media feed".to_string(),
        field: "media:content url",
    })?;

    Ok(MediaItem {
        title: item.media_title.unwrap_or_else(|| episode.title.clone()),
        mediagen: FetchRequest::new(url, "requesting playplex mediagen")
            .query("acceptMethods", "hls")
            .query("format", "json"),
    })
}

fn intl_media_item(
    config: &AccessConfig,
    item: FeedItem,
    episode: &Episode,
    region: &Region,
) -> Result<MediaItem> {
    let guid = item.guid.ok_or_else(|| NickError::MissingField {
        context: "reading intl item feed".to_string(),
        field: "guid",
    })?;

    let url = fill_template(
        &config.mediagen_root,
        &[("uri", &guid), ("device", INTL_DEVICE), ("lang", &region.lang)],
    );

    Ok(MediaItem {
        title: item.title.unwrap_or_else(|| episode.title.clone()),
        mediagen: FetchRequest::new(url, "requesting intl mediagen")
            .query("deviceOsVersion", "10")
            .query("format", "json"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubFetcher;

    fn region(family: CatalogFamily) -> Region {
        Region {
            name: "Test".to_string(),
            lang: "de".to_string(),
            locale: "de-de".to_string(),
            family,
        }
    }

    fn intl_series() -> Series {
        Series {
            title: "Test Show".to_string(),
            region: region(CatalogFamily::Intl),
            episodes: Some(EpisodesLink::UrlKey("test-show".to_string())),
        }
    }

    fn episode() -> Episode {
        Episode {
            title: "Ep 1".to_string(),
            id: "1234".to_string(),
        }
    }

    #[tokio::test]
    async fn playplex_series_are_filtered_by_entity_type() {
        let fetcher = StubFetcher::new().with(
            format!("{PLAYPLEX_PROMOLIST_URL}/{PLAYPLEX_PROMO_MGID}"),
            r#"{"data": {"items": [
                {"entityType": "series", "title": "First", "links": {"episode": "http://feeds.example.com/first"}},
                {"entityType": "promo", "title": "Ad", "links": {}},
                {"entityType": "series", "title": "Second", "links": {"season": "http://feeds.example.com/s"}}
            ]}}"#,
        );
        let client = NickClient::with_fetcher(fetcher);

        let series = client
            .list_series(&region(CatalogFamily::Playplex))
            .await
            .unwrap();

        let titles: Vec<&str> = series.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(
            series[0].episodes,
            Some(EpisodesLink::Feed("http://feeds.example.com/first".to_string()))
        );
        assert_eq!(series[1].episodes, None);

        let requests = client.fetcher().requests();
        let request = &requests[0];
        assert_eq!(request.query_value("brand"), Some("nick"));
        assert_eq!(request.query_value("region"), Some("us"));
    }

    #[tokio::test]
    async fn intl_series_carry_url_key_and_region() {
        let fetcher = StubFetcher::new().with(
            format!("{INTL_API_URL}/intl-editorial-content-categories/properties"),
            r#"[
                {"seriesTitle": "SpongeBob", "urlKey": "spongebob"},
                {"seriesTitle": "Promo", "entityType": "promotion"},
                {"seriesTitle": "No Key"}
            ]"#,
        );
        let client = NickClient::with_fetcher(fetcher);

        let series = client.list_series(&region(CatalogFamily::Intl)).await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series[0].episodes,
            Some(EpisodesLink::UrlKey("spongebob".to_string()))
        );
        assert_eq!(series[0].region.locale, "de-de");
        assert_eq!(series[1].episodes, None);

        let requests = client.fetcher().requests();
        let request = &requests[0];
        assert_eq!(request.query_value("overridelang"), Some("true"));
        assert_eq!(request.query_value("lang"), Some("de"));
        assert_eq!(request.query_value("locale"), Some("de-de"));
        assert_eq!(request.query_value("brand"), Some("NickIntl"));
    }

    #[tokio::test]
    async fn missing_episode_link_fails_without_request() {
        let client = NickClient::with_fetcher(StubFetcher::new());
        let series = Series {
            episodes: None,
            ..intl_series()
        };

        let err = client.list_episodes(&series).await.unwrap_err();
        assert!(matches!(err, NickError::NoEpisodesAvailable { ref series } if series == "Test Show"));
        assert!(err.is_expected());
        assert!(client.fetcher().requests().is_empty());
    }

    #[tokio::test]
    async fn playplex_episodes_come_from_episode_link() {
        let fetcher = StubFetcher::new().with(
            "http://feeds.example.com/first",
            r#"{"data": {"items": [
                {"title": "Ep 1", "mgid": "mgid:arc:episode:nick.com:1"},
                {"title": "Ep 2", "mgid": "mgid:arc:episode:nick.com:2"}
            ]}}"#,
        );
        let client = NickClient::with_fetcher(fetcher);
        let series = Series {
            title: "First".to_string(),
            region: region(CatalogFamily::Playplex),
            episodes: Some(EpisodesLink::Feed("http://feeds.example.com/first".to_string())),
        };

        let episodes = client.list_episodes(&series).await.unwrap();
        assert_eq!(
            episodes,
            vec![
                Episode {
                    title: "Ep 1".to_string(),
                    id: "mgid:arc:episode:nick.com:1".to_string()
                },
                Episode {
                    title: "Ep 2".to_string(),
                    id: "mgid:arc:episode:nick.com:2".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn intl_episodes_are_queried_by_url_key() {
        let fetcher = StubFetcher::new().with(
            format!("{INTL_API_URL}/content-collection/config/groups"),
            r#"{"results": [{"title": "Ep 1", "id": "1234"}]}"#,
        );
        let client = NickClient::with_fetcher(fetcher);

        let episodes = client.list_episodes(&intl_series()).await.unwrap();
        assert_eq!(episodes, vec![episode()]);

        let requests = client.fetcher().requests();
        let request = &requests[0];
        assert_eq!(request.query_value("series"), Some("test-show"));
        assert_eq!(request.query_value("types"), Some("episode"));
        assert_eq!(request.query_value("locale"), Some("de-de"));
    }

    #[tokio::test]
    async fn intl_media_items_follow_access_config() {
        let fetcher = StubFetcher::new()
            .with(
                ACCESS_URL,
                r#"{"config": {
                    "feed": "http://feeds.example.com/feed?uri={uri}&lang={lang}",
                    "brightcove_mediagenRootURL": "http://media.example.com/mediagen?uri={uri}&device={device}&lang={lang}"
                }}"#,
            )
            .with(
                "http://feeds.example.com/feed?uri=mgid:arc:episode:nickelodeonplay.com:1234&lang=de",
                r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel>
                    <item><guid>mgid:a</guid><title>Ep 1: "A" x</title></item>
                    <item><guid>mgid:b</guid></item>
                </channel></rss>"#,
            );
        let client = NickClient::with_fetcher(fetcher);

        let items = client.media_items(&intl_series(), &episode()).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, r#"Ep 1: "A" x"#);
        assert_eq!(
            items[0].mediagen.url,
            "http://media.example.com/mediagen?uri=mgid:a&device=Android&lang=de"
        );
        assert_eq!(items[0].mediagen.query_value("deviceOsVersion"), Some("10"));
        assert_eq!(items[1].title, "Ep 1");

        let requests = client.fetcher().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[0].query_value("uri"),
            Some("mgid:arc:episode:nickelodeonplay.com:1234")
        );
        assert_eq!(
            requests[0].referer.as_deref(),
            Some(
                "http://media.mtvnservices.com/player/api/mobile/androidNative/nick_play_app.live.Android.de-de/"
            )
        );
    }

    #[tokio::test]
    async fn playplex_media_items_come_from_dispatch_feed() {
        let fetcher = StubFetcher::new().with(
            PLAYPLEX_DISPATCH_URL,
            r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
                <media:group>
                    <media:content url="http://media.example.com/mediagen/a"/>
                    <media:title>Segment: "A" x</media:title>
                </media:group>
            </item></channel></rss>"#,
        );
        let client = NickClient::with_fetcher(fetcher);
        let series = Series {
            region: region(CatalogFamily::Playplex),
            ..intl_series()
        };
        let episode = Episode {
            title: "Ep 1".to_string(),
            id: "mgid:arc:episode:nick.com:1".to_string(),
        };

        let items = client.media_items(&series, &episode).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, r#"Segment: "A" x"#);
        assert_eq!(items[0].mediagen.url, "http://media.example.com/mediagen/a");
        assert_eq!(items[0].mediagen.query_value("acceptMethods"), Some("hls"));

        let requests = client.fetcher().requests();
        let request = &requests[0];
        assert_eq!(request.query_value("feed"), Some("nick_arc_player_prime"));
        assert_eq!(request.query_value("mgid"), Some("mgid:arc:episode:nick.com:1"));
    }

    #[tokio::test]
    async fn media_descriptor_reads_renditions_and_transcripts() {
        let fetcher = StubFetcher::new().with(
            "http://media.example.com/mediagen/a",
            r#"{"package": {"video": {"item": [{
                "rendition": [
                    {"src": "https://cdn.example.com/a/,stream_640x360_400,stream_1280x720_1200,/master.m3u8"}
                ],
                "transcript": [{"typographic": [
                    {"format": "vtt", "src": "https://cdn.example.com/a.vtt"},
                    {"format": "ttml", "src": "https://cdn.example.com/a.ttml"}
                ]}]
            }]}}}"#,
        );
        let client = NickClient::with_fetcher(fetcher);
        let item = MediaItem {
            title: "A".to_string(),
            mediagen: FetchRequest::new("http://media.example.com/mediagen/a", "mediagen"),
        };

        let descriptor = client.media_descriptor(&item).await.unwrap();
        assert!(matches!(descriptor.renditions, Renditions::EncodedMultiTier(_)));
        assert_eq!(descriptor.transcripts.len(), 2);
        assert_eq!(
            descriptor.caption().map(|t| t.src.as_str()),
            Some("https://cdn.example.com/a.ttml")
        );
    }

    #[tokio::test]
    async fn fetch_subtitle_returns_raw_text() {
        let fetcher =
            StubFetcher::new().with("https://cdn.example.com/a.ttml", "<tt>\n raw &amp; text</tt>");
        let client = NickClient::with_fetcher(fetcher);
        let descriptor = MediaDescriptor {
            renditions: Renditions::ExplicitList(Vec::new()),
            transcripts: vec![TranscriptDescriptor {
                format: "ttml".to_string(),
                src: "https://cdn.example.com/a.ttml".to_string(),
            }],
        };

        let text = client.fetch_subtitle(&descriptor).await.unwrap();
        assert_eq!(text.as_deref(), Some("<tt>\n raw &amp; text</tt>"));
    }

    #[tokio::test]
    async fn fetch_subtitle_without_caption_makes_no_request() {
        let client = NickClient::with_fetcher(StubFetcher::new());
        let descriptor = MediaDescriptor {
            renditions: Renditions::ExplicitList(Vec::new()),
            transcripts: vec![TranscriptDescriptor {
                format: "vtt".to_string(),
                src: "https://cdn.example.com/a.vtt".to_string(),
            }],
        };

        assert_eq!(client.fetch_subtitle(&descriptor).await.unwrap(), None);
        assert!(client.fetcher().requests().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let fetcher = StubFetcher::new().with(
            format!("{INTL_API_URL}/intl-editorial-content-categories/properties"),
            "<html>maintenance</html>",
        );
        let client = NickClient::with_fetcher(fetcher);

        let err = client
            .list_series(&region(CatalogFamily::Intl))
            .await
            .unwrap_err();
        assert!(matches!(err, NickError::Json { .. }));
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let client = NickClient::with_fetcher(StubFetcher::new());
        let err = client.list_episodes(&intl_series()).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn fill_template_replaces_known_placeholders() {
        assert_eq!(
            fill_template(
                "http://x/{uri}/{lang}/{unknown}?d={device}",
                &[("uri", "mgid:1"), ("lang", "nl"), ("device", "Android")]
            ),
            "http://x/mgid:1/nl/{unknown}?d=Android"
        );
    }

    #[test]
    fn fill_template_does_not_rescan_values() {
        assert_eq!(
            fill_template(
                "{uri}/{lang}",
                &[("uri", "mgid:{lang}:1"), ("lang", "nl")]
            ),
            "mgid:{lang}:1/nl"
        );
        assert_eq!(
            fill_template("x{uri}{open", &[("uri", "1")]),
            "x1{open"
        );
    }
}
