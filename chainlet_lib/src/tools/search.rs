use regex::Regex;
use crate::error::Error;
use crate::request::Client;
use super::Tool;

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
const MAX_RESULTS: usize = 5;

/// Web search over the DuckDuckGo HTML endpoint (no API key needed).
pub struct WebSearch {
    client: Box<dyn Client>,
}

impl WebSearch {

    /// Create an instance.
    pub fn new(client: Box<dyn Client>) -> Self {
        WebSearch {
            client,
        }
    }
}

impl Tool for WebSearch {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "A wrapper around DuckDuckGo Search. Useful for when you need to answer questions about current events. Input should be a search query."
    }

    fn invoke(&self, input: &str) -> Result<String, Error> {
        let query = input.trim();
        if query.is_empty() {
            return Err(Error::ToolError("search query is empty".to_owned()));
        }

        let html = self.client.get_text(SEARCH_URL, &[("q", query)])?;

        let results = extract_results(&html)?;

        tracing::debug!(query, results = results.len(), "web search");

        if results.is_empty() {
            Ok(format!("No results found for: {}", query))
        } else {
            Ok(results.join("\n\n"))
        }
    }
}

// Inner markup of the element carrying `class="<class>"`, up to its closing tag.
fn element_html<'a>(chunk: &'a str, class: &str) -> Option<&'a str> {
    let pos = chunk.find(&format!("class=\"{class}\""))?;
    let open = chunk[..pos].rfind('<')?;
    let tag: String = chunk[open + 1..]
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect();
    let close = format!("</{tag}>");
    let (_, rest) = chunk[pos..].split_once('>')?;
    rest.split(close.as_str()).next()
}

/// Extract title, snippet and URL of the top results.
fn extract_results(html: &str) -> Result<Vec<String>, Error> {
    let tags = Regex::new(r"<[^>]*>").map_err(|e| Error::Error(format!("invalid markup regex: {e}")))?;
    let text = |chunk: &str, class: &str| {
        element_html(chunk, class)
            .map(|inner| html_decode(tags.replace_all(inner, "").trim()))
            .unwrap_or_default()
    };

    let mut results = Vec::new();

    for chunk in html.split("result__body").skip(1) {
        if results.len() == MAX_RESULTS {
            break;
        }

        let title = text(chunk, "result__a");
        if title.is_empty() {
            continue;
        }
        let snippet = text(chunk, "result__snippet");
        let url = text(chunk, "result__url");

        results.push(format!("{title}\n{snippet}\nURL: {url}"));
    }

    Ok(results)
}

/// Basic HTML entity decoding.
fn html_decode(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
