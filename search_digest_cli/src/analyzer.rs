use scraper::{Html, Selector};

use crate::normalizer::TextNormalizer;
use crate::WordFrequencyMap;

/// Only the first this-many matching nodes of a page are looked at.
pub const MAX_NODES: usize = 100;

const NODE_SELECTOR: &str = "p, div, span, a, h1, h2, h3, h4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Paragraph,
    Division,
    Span,
    Anchor,
    Heading(u8),
}

impl TagKind {
    pub fn from_tag_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "p" => Some(TagKind::Paragraph),
            "div" => Some(TagKind::Division),
            "span" => Some(TagKind::Span),
            "a" => Some(TagKind::Anchor),
            "h1" => Some(TagKind::Heading(1)),
            "h2" => Some(TagKind::Heading(2)),
            "h3" => Some(TagKind::Heading(3)),
            "h4" => Some(TagKind::Heading(4)),
            _ => None,
        }
    }

    pub fn counts_words(self) -> bool {
        match self {
            TagKind::Heading(level) => (1..=4).contains(&level),
            _ => true,
        }
    }

    /// Narrower than [`TagKind::counts_words`]: divisions, spans and anchors
    /// never contribute summary sentences.
    pub fn collects_sentences(self) -> bool {
        match self {
            TagKind::Paragraph => true,
            TagKind::Heading(level) => (1..=4).contains(&level),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub kind: TagKind,
    pub text: String,
}

impl TextNode {
    pub fn new(kind: TagKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Tagged text of one page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pub nodes: Vec<TextNode>,
}

impl PageText {
    pub fn new(nodes: Vec<TextNode>) -> Self {
        Self { nodes }
    }

    /// Parses an HTML document and keeps the first [`MAX_NODES`] matching
    /// elements. Nested elements each carry all of their descendant text.
    pub fn from_html(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let Ok(selector) = Selector::parse(NODE_SELECTOR) else {
            return Self::default();
        };

        let nodes = doc
            .select(&selector)
            .filter_map(|el| {
                let kind = TagKind::from_tag_name(el.value().name())?;
                Some(TextNode::new(kind, el.text().collect::<String>()))
            })
            .take(MAX_NODES)
            .collect();

        Self { nodes }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAnalysis {
    pub words: WordFrequencyMap,
    pub sentences: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PageAnalyzer {
    normalizer: TextNormalizer,
}

impl PageAnalyzer {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn analyze<S: AsRef<str>>(&self, page: &PageText, query_terms: &[S]) -> PageAnalysis {
        let mut analysis = PageAnalysis::default();

        for node in page
            .nodes
            .iter()
            .filter(|node| node.kind.counts_words())
            .take(MAX_NODES)
        {
            for token in node.text.split_whitespace() {
                if let Some(word) = self.normalizer.normalize(token) {
                    *analysis.words.entry(word).or_insert(0) += 1;
                }
            }

            if node.kind.collects_sentences() {
                // Blank nodes add no sentence, so they never take one of the
                // summary slots.
                let sentence = node.text.trim();
                if !sentence.is_empty() {
                    analysis.sentences.push(sentence.to_string());
                }
            }
        }

        let query_stems: Vec<String> = query_terms
            .iter()
            .map(|term| self.normalizer.stem(term.as_ref()))
            .collect();
        if !query_stems.is_empty() {
            analysis
                .words
                .retain(|word, _| !query_stems.contains(&self.normalizer.stem(word)));
        }

        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(nodes: Vec<TextNode>, query: &[&str]) -> PageAnalysis {
        PageAnalyzer::default().analyze(&PageText::new(nodes), query)
    }

    #[test]
    fn query_term_and_its_inflections_are_dropped() {
        let analysis = analyze(
            vec![TextNode::new(
                TagKind::Paragraph,
                "Cats are great pets cats love naps",
            )],
            &["cats"],
        );

        assert!(!analysis.words.contains_key("cats"));
        for word in ["great", "pets", "love", "naps"] {
            assert_eq!(analysis.words.get(word), Some(&1), "{word}");
        }
        assert_eq!(analysis.words.len(), 4);
        assert_eq!(analysis.sentences, vec!["Cats are great pets cats love naps"]);
    }

    #[test]
    fn only_paragraphs_and_headings_give_sentences() {
        let analysis = analyze(
            vec![
                TextNode::new(TagKind::Heading(1), "  Garden tools  "),
                TextNode::new(TagKind::Division, "Garden shed"),
                TextNode::new(TagKind::Anchor, "Garden link"),
                TextNode::new(TagKind::Span, "Garden span"),
                TextNode::new(TagKind::Heading(4), "Garden notes"),
                TextNode::new(TagKind::Paragraph, "   "),
            ],
            &[],
        );

        assert_eq!(analysis.sentences, vec!["Garden tools", "Garden notes"]);
        assert_eq!(analysis.words.get("garden"), Some(&5));
        assert_eq!(analysis.words.get("shed"), Some(&1));
    }

    #[test]
    fn node_cap_applies() {
        let nodes = (0..150)
            .map(|_| TextNode::new(TagKind::Span, "widget"))
            .collect();
        let analysis = analyze(nodes, &[]);
        assert_eq!(analysis.words.get("widget"), Some(&(MAX_NODES as u64)));
    }

    #[test]
    fn every_counted_word_respects_the_filters() {
        let analysis = analyze(
            vec![TextNode::new(
                TagKind::Paragraph,
                "The 3rd \"Report\", on: U.K. policy is at it: OK? x",
            )],
            &["policies"],
        );

        for word in analysis.words.keys() {
            assert!(word.chars().count() > 2, "{word}");
            assert!(word.chars().next().unwrap().is_alphabetic(), "{word}");
            assert!(!word.contains(['.', ',', ':', '"']), "{word}");
            assert_eq!(word, &word.to_lowercase());
        }
        assert!(analysis.words.contains_key("report"));
        assert!(analysis.words.contains_key("ok?"));
        assert!(!analysis.words.contains_key("policy"));
    }

    #[test]
    fn from_html_keeps_document_order_and_nested_text() {
        let html = r#"<html><body>
            <h1>Title <span>here</span></h1>
            <div><p>First para</p></div>
            <h5>ignored</h5>
            <a href="/x">Link text</a>
        </body></html>"#;
        let page = PageText::from_html(html);

        let kinds: Vec<TagKind> = page.nodes.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TagKind::Heading(1),
                TagKind::Span,
                TagKind::Division,
                TagKind::Paragraph,
                TagKind::Anchor,
            ]
        );
        assert_eq!(page.nodes[0].text, "Title here");
        assert_eq!(page.nodes[2].text.trim(), "First para");
    }

    #[test]
    fn from_html_caps_nodes() {
        let html = format!("<body>{}</body>", "<p>x</p>".repeat(MAX_NODES + 20));
        assert_eq!(PageText::from_html(&html).nodes.len(), MAX_NODES);
    }
}
