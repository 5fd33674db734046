//! Diversion page served in place of a distraction site.

use local_server_core::{pick_weighted, Band};
use rand::Rng;

use crate::rest::{FEED_PATH, SEARCH_PATH};

/// Exclusive upper bound of the draw used to pick a variant.
pub const DRAW_RANGE: u32 = 100;

/// What the page shows under its caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Media {
    /// An embedded video player.
    Video(&'static str),
    /// A fixed image.
    Image(&'static str),
    /// An image served by the search provider route.
    SearchImage,
    /// An image served by the feed provider route.
    FeedImage,
}

/// A caption plus the media shown below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub caption: &'static str,
    pub media: Media,
}

static VARIANTS: [Band<Variant>; 4] = [
    Band::new(
        10,
        Variant {
            caption: "Look what it does to you&hellip;",
            media: Media::Video("//www.youtube.com/embed/Naj5NIVl4mw"),
        },
    ),
    Band::new(
        20,
        Variant {
            caption: "You don't want to look like this, do you?",
            media: Media::Image("http://img-9gag-ftw.9cache.com/photo/ad6eZdQ_700b.jpg"),
        },
    ),
    Band::new(
        25,
        Variant {
            caption: "Warm kitty, soft kitty",
            media: Media::Image("http://placekitten.com/g/200/300"),
        },
    ),
    Band::new(
        75,
        Variant {
            caption: "Husky instead?",
            media: Media::SearchImage,
        },
    ),
];

static DEFAULT_VARIANT: Variant = Variant {
    caption: "Why not enjoy this nice picture from reddit instead?",
    media: Media::FeedImage,
};

/// Select the page variant for a draw in `0..DRAW_RANGE`.
pub fn variant_for(draw: u32) -> &'static Variant {
    pick_weighted(draw, &VARIANTS, &DEFAULT_VARIANT)
}

/// Renders diversion pages.
#[derive(Debug, Clone)]
pub struct DiversionRenderer {
    search_query: String,
}

impl DiversionRenderer {
    /// `search_query` is what the search-backed variant asks for.
    pub fn new(search_query: impl Into<String>) -> Self {
        Self {
            search_query: search_query.into(),
        }
    }

    /// Render the page for `host` with a fresh random draw.
    pub fn render(&self, host: &str) -> String {
        let draw = rand::thread_rng().gen_range(0..DRAW_RANGE);
        self.render_with_draw(host, draw)
    }

    /// Render the page for `host` with the variant chosen by `draw`.
    pub fn render_with_draw(&self, host: &str, draw: u32) -> String {
        let variant = variant_for(draw);
        page(host, &self.body(variant))
    }

    fn body(&self, variant: &Variant) -> String {
        let media = match variant.media {
            Media::Video(src) => format!(
                r#"<iframe width="560" height="315" src="{src}" frameborder="0" allowfullscreen></iframe>"#
            ),
            Media::Image(src) => format!(r#"<img src="{src}">"#),
            Media::SearchImage => {
                let query: String =
                    url::form_urlencoded::byte_serialize(self.search_query.as_bytes()).collect();
                format!(r#"<img src="{SEARCH_PATH}?query={query}">"#)
            }
            Media::FeedImage => format!(r#"<img src="{FEED_PATH}">"#),
        };
        format!("\n<p>{}</p>\n<p>{media}</p>", variant.caption)
    }
}

fn page(host: &str, body: &str) -> String {
    format!(
        r#"
<html><head>
<title>No {host}</title>
<style>
body {{ background-color: black; color: white; }}
img {{ max-width:1000px; max-height:500px;}}</style>
</head>
<body>
<center>
<h1>No need to procrastinate on <em>{host}</em></h1>
{body}
</center>
</body></html>"#
    )
}
