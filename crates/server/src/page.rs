//! Newsletter page rendering

use askama::Template;
use signal_client::strip_markup;
use signal_common::{Result, SignalError};
use signal_llm::ReadingLevel;

use crate::articles::Article;

/// Inputs for one rendered page
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub articles: &'a [Article],
    /// URL the level buttons POST to
    pub summarize_url: &'a str,
    /// Third-party subscription form action
    pub subscribe_form_url: &'a str,
    /// Emit article summaries as raw markup. Only safe while the dataset
    /// is build-time controlled.
    pub trust_markup: bool,
}

struct ArticleCard<'a> {
    title: &'a str,
    url: &'a str,
    summary: &'a str,
    /// Summary with markup stripped, sent by the level buttons
    plain_text: String,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Signal.ai Newsletter</title>
<style>
body{font-family:system-ui,sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem;color:#1a1a1a}
.articles{display:grid;gap:1rem}
.card{border:1px solid #ddd;border-radius:8px;padding:1rem}
.level-buttons{display:flex;gap:.5rem;margin-top:.75rem}
form{display:flex;gap:.5rem;margin:1rem 0 2rem}
</style>
</head>
<body data-summarize-url="{{ summarize_url }}">
<main>
<h1>Signal.ai Newsletter</h1>
<form action="{{ subscribe_form_url }}" method="post">
<input type="email" name="email_address" placeholder="Your email" required>
<button type="submit">Subscribe</button>
</form>
<section>
<h2>Latest Articles</h2>
<div class="articles">
{% for card in cards %}
<div class="card">
<h3>{{ card.title }}</h3>
<p>{% if trust_markup %}{{ card.summary|safe }}{% else %}{{ card.summary }}{% endif %}</p>
<a href="{{ card.url }}" target="_blank" rel="noopener noreferrer">Read article</a>
<div class="level-buttons" data-text="{{ card.plain_text }}">
{% for level in levels %}
<button type="button" data-level="{{ level }}">{{ level }}</button>
{% endfor %}
</div>
</div>
{% endfor %}
</div>
</section>
</main>
<script>
document.querySelectorAll('.level-buttons button').forEach(function (button) {
  button.addEventListener('click', async function () {
    var level = button.dataset.level;
    var text = button.closest('.level-buttons').dataset.text;
    try {
      var res = await fetch(document.body.dataset.summarizeUrl, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ level: level, text: text })
      });
      if (!res.ok) {
        throw new Error('Request failed');
      }
      var data = await res.json();
      alert(level + ' summary: ' + data.summary);
    } catch (err) {
      alert('Error generating ' + level.toLowerCase() + ' summary');
    }
  });
});
</script>
</body>
</html>
"#,
    ext = "html"
)]
struct IndexTemplate<'a> {
    summarize_url: &'a str,
    subscribe_form_url: &'a str,
    cards: Vec<ArticleCard<'a>>,
    levels: [ReadingLevel; 3],
    trust_markup: bool,
}

/// Render the full newsletter page
///
/// Titles, URLs and attributes are escaped by the template; summaries
/// pass through unescaped only when `trust_markup` is set.
pub fn render_page(ctx: &PageContext<'_>) -> Result<String> {
    let cards = ctx
        .articles
        .iter()
        .map(|article| ArticleCard {
            title: &article.title,
            url: &article.url,
            summary: &article.summary,
            plain_text: strip_markup(&article.summary),
        })
        .collect();

    let template = IndexTemplate {
        summarize_url: ctx.summarize_url,
        subscribe_form_url: ctx.subscribe_form_url,
        cards,
        levels: ReadingLevel::ALL,
        trust_markup: ctx.trust_markup,
    };

    template
        .render()
        .map_err(|e| SignalError::render(format!("newsletter page: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articles::parse_published;

    fn sample() -> Vec<Article> {
        vec![Article {
            title: "Models & <Metrics>".to_string(),
            url: "https://example.com/a?x=1&y=2".to_string(),
            summary: "<b>Bold</b> claim".to_string(),
            published: parse_published("2024-05-01").unwrap(),
            ..Article::default()
        }]
    }

    fn render(articles: &[Article], trust_markup: bool) -> String {
        render_page(&PageContext {
            articles,
            summarize_url: "/signal/api/summarize",
            subscribe_form_url: "https://forms.example.com/subscribe",
            trust_markup,
        })
        .unwrap()
    }

    #[test]
    fn test_page_structure() {
        let html = render(&sample(), true);

        assert!(html.contains("<h1>Signal.ai Newsletter</h1>"));
        assert!(html.contains("<h2>Latest Articles</h2>"));
        assert!(html.contains("data-summarize-url=\"/signal/api/summarize\""));
        assert!(html.contains("action=\"https://forms.example.com/subscribe\" method=\"post\""));
        assert!(html.contains("name=\"email_address\""));
        assert!(html.contains("target=\"_blank\" rel=\"noopener noreferrer\""));
        for level in ["Novice", "Intermediate", "Expert"] {
            assert!(html.contains(&format!("data-level=\"{}\"", level)));
        }
    }

    #[test]
    fn test_title_and_url_are_escaped() {
        let html = render(&sample(), true);
        assert!(html.contains("<h3>Models &amp; &lt;Metrics&gt;</h3>"));
        assert!(html.contains("href=\"https://example.com/a?x=1&amp;y=2\""));
    }

    #[test]
    fn test_attribute_quotes_are_escaped() {
        let mut articles = sample();
        articles[0].url = "https://example.com/\" onclick=\"x".to_string();
        let html = render(&articles, true);
        assert!(html.contains("href=\"https://example.com/&quot; onclick=&quot;x\""));
        assert!(!html.contains("onclick=\"x"));
    }

    #[test]
    fn test_trusted_summary_is_raw() {
        let html = render(&sample(), true);
        assert!(html.contains("<p><b>Bold</b> claim</p>"));
    }

    #[test]
    fn test_untrusted_summary_is_escaped() {
        let html = render(&sample(), false);
        assert!(html.contains("<p>&lt;b&gt;Bold&lt;/b&gt; claim</p>"));
        assert!(!html.contains("<b>Bold</b>"));
    }

    #[test]
    fn test_buttons_carry_stripped_text() {
        let html = render(&sample(), true);
        assert!(html.contains("data-text=\"Bold claim\""));
    }

    #[test]
    fn test_empty_list_still_renders_section() {
        let html = render(&[], true);
        assert!(html.contains("<h2>Latest Articles</h2>"));
        assert!(!html.contains("class=\"card\""));
    }
}
