//! Web-scrape noise: tracking/metadata lines, cookie notices, forms and
//! site chrome (navigation, headers, footers, sidebars).
//!
//! Order inside each group runs from the narrowest pattern to the broadest.

use crate::{Rule, RuleCategory};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tidy_core::{ContentType, Result};
use ContentType::*;

// tracking / metadata
pub const SCRAPER_WARNING: &str = "scraper_warning";
pub const PUBLISHED_TIME: &str = "published_time";
pub const TRACKING_PIXEL: &str = "tracking_pixel";
pub const META_TITLE_URL: &str = "meta_title_url";
pub const GITHUB_LINK: &str = "github_link";
pub const COMMENT_PROMPT: &str = "comment_prompt";
// policy boilerplate
pub const COOKIE_NOTICE: &str = "cookie_notice";
// forms / CTAs
pub const HTML_FORM: &str = "html_form";
pub const FORM_BLOCK: &str = "form_block";
// chrome
pub const NAV_LIST_HTML: &str = "nav_list_html";
pub const NAV_HTML: &str = "nav_html";
pub const SIDEBAR_HTML: &str = "sidebar_html";
pub const SLIDER_HTML: &str = "slider_html";
pub const HEADER_HTML: &str = "header_html";
pub const FOOTER_HTML: &str = "footer_html";
pub const LOGO_IMAGE: &str = "logo_image";
pub const HORIZONTAL_RULE: &str = "horizontal_rule";
pub const POWERED_BY_FOOTER: &str = "powered_by_footer";
pub const ADDRESS_FOOTER: &str = "address_footer";
pub const TRAILING_NAV_LINKS: &str = "trailing_nav_links";
pub const NAV_PIPE_LINE: &str = "nav_pipe_line";
pub const TEXT_NAV_MENU: &str = "text_nav_menu";
pub const LINK_LIST: &str = "link_list";

/// Longest line a plain-text nav menu entry may have.
const NAV_MENU_MAX_LINE: usize = 60;

static RE_NAV_ITEM_WORDS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]").unwrap());

const FORM_TITLES: &str =
    "Subscribe|Sign up|Join|Register|Booking|Enquiry|Get in Touch|Send Message|Newsletter|Email Updates|Updates on|Contact";
const FORM_FIELDS: &str = "(?:First |Last )?Name|Full Name|Email(?: Address)?|Phone(?: Number)?|Address|Message|Comments?|Company|Organi[sz]ation|Subject|Enquiry|Website";
const NAV_WORDS: &str = "Home|About|Contact|Services|Products|Blog|News|Shop";

fn nav_item() -> String {
    r"(?:\[[^\]\n]{1,40}\]\([^)\n]*\)|[\w&'.-]+(?:[ \t][\w&'.-]+){0,3})".to_string()
}

pub(crate) fn tracking_rules() -> Result<Vec<Rule>> {
    let web = [Docs, Markdown];
    Ok(vec![
        Rule::builder(
            SCRAPER_WARNING,
            RuleCategory::TrackingMetadata,
            r"(?:This content was automatically scraped|Do not scrape|Web scraping not allowed|Crawling not permitted|Data extraction prohibited)[^\n.]*\.?",
        )
        .ignore_case()
        .applies_to(&web)
        .build()?,
        Rule::builder(
            PUBLISHED_TIME,
            RuleCategory::TrackingMetadata,
            r"(?:Published|Posted on|Posted)(?:[ \t]*(?:at|on))?:?[ \t]*\d{1,2}[./-]\d{1,2}[./-]\d{2,4}(?:[ \t]+\d{1,2}:\d{2}(?::\d{2})?(?:[ \t]*[AP]M)?)?",
        )
        .ignore_case()
        .applies_to(&web)
        .build()?,
        Rule::builder(
            TRACKING_PIXEL,
            RuleCategory::TrackingMetadata,
            r#"<img\b[^>]*(?:tracking|pixel|analytics|stats)[^>]*>|<img\b[^>]*\bheight=["']?1\b[^>]*\bwidth=["']?1\b[^>]*>|<img\b[^>]*\bwidth=["']?1\b[^>]*\bheight=["']?1\b[^>]*>"#,
        )
        .ignore_case()
        .applies_to(&web)
        .build()?,
        Rule::builder(META_TITLE_URL, RuleCategory::TrackingMetadata, r"^(?:Title|URL|Source):[ \t]+\S[^\n]*(?:\n|\z)")
            .multiline()
            .applies_to(&[Docs])
            .build()?,
        Rule::builder(
            GITHUB_LINK,
            RuleCategory::TrackingMetadata,
            r"^[ \t]*(?:GitHub|Repository|Source code):[ \t]+https?://(?:www\.)?github\.com/[^/\s]+/[^/\s]+[ \t]*(?:\n|\z)",
        )
        .multiline()
        .ignore_case()
        .applies_to(&[Docs])
        .build()?,
        Rule::builder(
            COMMENT_PROMPT,
            RuleCategory::TrackingMetadata,
            r"(?:Leave a (?:comment|reply)|Add your comment|Post a comment|Comments below|Share your thoughts)[^\n.]*\.?",
        )
        .ignore_case()
        .applies_to(&web)
        .build()?,
    ])
}

pub(crate) fn policy_rules() -> Result<Vec<Rule>> {
    Ok(vec![Rule::builder(
        COOKIE_NOTICE,
        RuleCategory::PolicyBoilerplate,
        r"(?:This (?:website|site) uses cookies|We use cookies|Accept (?:all )?cookies|We value your privacy)[^\n.]*\.?",
    )
    .ignore_case()
    .applies_to(&[Docs, Markdown])
    .build()?])
}

pub(crate) fn form_rules() -> Result<Vec<Rule>> {
    // Title line, optional underline, then 2..=12 field/button/notice lines.
    let field_line = format!(
        r"[ \t]*(?:\*[ \t]*indicates required[^\n]*|(?:{FORM_FIELDS})\b[ \t]*(?:\*|\(required\))?[ \t]*(?::[^\n]{{0,80}})?|(?:Submit|Send|Register|Subscribe|Sign Up|Book Now)\b[^\n]{{0,40}}|(?:Your (?:data|privacy|information)|We (?:do not|never) share|You can unsubscribe)[^\n]{{0,160}}|/\*[^\n]*real people should not fill this in[^\n]*\*/[^\n]*)"
    );
    let form_block = format!(
        r"^(?:{FORM_TITLES})[ \t\w]{{0,40}}\n(?:[-=]{{3,}}[ \t]*\n)?(?:[ \t]*\n)*(?:{field_line}(?:\n|\z)(?:[ \t]*\n)*){{2,12}}"
    );
    Ok(vec![
        Rule::builder(HTML_FORM, RuleCategory::FormsCta, r"<form\b[^>]*>.*?</form>")
            .dotall()
            .ignore_case()
            .applies_to(&[Docs, Markdown])
            .build()?,
        Rule::builder(FORM_BLOCK, RuleCategory::FormsCta, form_block)
            .multiline()
            .ignore_case()
            .applies_to(&[Docs])
            .build()?,
    ])
}

pub(crate) fn chrome_rules() -> Result<Vec<Rule>> {
    let html = [Docs, Markdown];
    let item = nav_item();
    let nav_pipe_line = format!(r"^[ \t]*{item}(?:[ \t]*[|·•][ \t]*{item}){{2,11}}[ \t]*(?:\n|\z)");
    let nav_link = format!(r"\[(?:{NAV_WORDS})(?:[ \t]+(?:Page|Us|Me))?\]\([^)\n]*\)");
    let trailing_nav = format!(r"(?:{nav_link}(?:[ \t]+\|[ \t]+|[ \t]*\n[ \t]*)){{2,11}}{nav_link}");

    Ok(vec![
        // structural HTML
        Rule::builder(NAV_LIST_HTML, RuleCategory::WebsiteChrome, r"<(?:ul|ol)\b[^>]*(?:menu|navigation|navbar)[^>]*>.*?</(?:ul|ol)>")
            .dotall()
            .ignore_case()
            .applies_to(&html)
            .build()?,
        Rule::builder(NAV_HTML, RuleCategory::WebsiteChrome, r"<nav\b[^>]*>.*?</nav>")
            .dotall()
            .ignore_case()
            .applies_to(&html)
            .build()?,
        Rule::builder(
            SIDEBAR_HTML,
            RuleCategory::WebsiteChrome,
            r"<(?:div|section|aside)\b[^>]*(?:sidebar|widget-area)[^>]*>.*?</(?:div|section|aside)>",
        )
        .dotall()
        .ignore_case()
        .applies_to(&html)
        .build()?,
        Rule::builder(SLIDER_HTML, RuleCategory::WebsiteChrome, r"<div\b[^>]*(?:slider|carousel)[^>]*>.*?</div>")
            .dotall()
            .ignore_case()
            .applies_to(&html)
            .build()?,
        Rule::builder(
            HEADER_HTML,
            RuleCategory::WebsiteChrome,
            r"<header\b[^>]*>.*?</header>|<div\b[^>]*(?:site-header|page-header|main-header)[^>]*>.*?</div>",
        )
        .dotall()
        .ignore_case()
        .applies_to(&html)
        .build()?,
        Rule::builder(
            FOOTER_HTML,
            RuleCategory::WebsiteChrome,
            r"<footer\b[^>]*>.*?</footer>|<div\b[^>]*(?:site-footer|page-footer|main-footer)[^>]*>.*?</div>",
        )
        .dotall()
        .ignore_case()
        .applies_to(&html)
        .build()?,
        // assets, separators, footers
        Rule::builder(
            LOGO_IMAGE,
            RuleCategory::WebsiteChrome,
            r"<img\b[^>]*(?:logo|brand|site-icon)[^>]*>|!\[[^\]\n]*\blogo\b[^\]\n]*\]\([^)\n]*\)",
        )
        .ignore_case()
        .applies_to(&html)
        .build()?,
        // a blank line must precede the rule so setext underlines survive
        Rule::builder(HORIZONTAL_RULE, RuleCategory::WebsiteChrome, r"^[ \t]*\n[ \t]*(?:-{3,}|\*{3,}|_{3,})[ \t]*(?:\n|\z)")
            .multiline()
            .replace("\n")
            .applies_to(&[Docs])
            .build()?,
        Rule::builder(
            POWERED_BY_FOOTER,
            RuleCategory::WebsiteChrome,
            r"^[^\n]*(?:Powered by|Create your (?:own|free))[^\n]*(?:Weebly|Site Builder|IONOS|Wix|Website Builder|WordPress|Squarespace)[^\n]*(?:\n|\z)",
        )
        .multiline()
        .ignore_case()
        .applies_to(&html)
        .build()?,
        Rule::builder(
            ADDRESS_FOOTER,
            RuleCategory::WebsiteChrome,
            r"^(?:Address|Location|Connect With Us|Contact Us|Follow Us):?[ \t]*\n(?:[^\n]*\S[^\n]*\n){1,5}(?:[ \t]*\n|\z)",
        )
        .multiline()
        .ignore_case()
        .replace("\n")
        .applies_to(&[Docs])
        .build()?,
        // navigation, broadest last
        Rule::builder(TRAILING_NAV_LINKS, RuleCategory::WebsiteChrome, trailing_nav)
            .ignore_case()
            .applies_to(&html)
            .build()?,
        Rule::builder(NAV_PIPE_LINE, RuleCategory::WebsiteChrome, nav_pipe_line)
            .multiline()
            .applies_to(&[Docs])
            .build()?,
        Rule::builder(
            TEXT_NAV_MENU,
            RuleCategory::WebsiteChrome,
            r"^(?:[ \t]*[A-Z][\w&'-]*(?:[ \t]+[A-Z][\w&'-]*){0,4}[ \t]*\n){4,12}",
        )
        .multiline()
        .replace_with(keep_long_menu_lines)
        .applies_to(&[Docs])
        .build()?,
        Rule::builder(
            LINK_LIST,
            RuleCategory::WebsiteChrome,
            r"^(?:[ \t]*(?:[-*+][ \t]+)?\[[^\]\n]*\]\([^)\n]*\)[ \t]*(?:\n|\z)){3,40}",
        )
        .multiline()
        .applies_to(&[Docs])
        .build()?,
    ])
}

/// A run of short capitalised lines is a menu; anything longer is kept.
fn keep_long_menu_lines(caps: &Captures<'_>) -> String {
    let block = &caps[0];
    let is_menu = block
        .lines()
        .all(|l| l.trim().chars().count() <= NAV_MENU_MAX_LINE && RE_NAV_ITEM_WORDS.is_match(l));
    if is_menu {
        String::new()
    } else {
        block.to_string()
    }
}
