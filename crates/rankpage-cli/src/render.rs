//! Text and HTML renderings of a [`NavigationView`].
//!
//! Renderers only format what the view carries; every link target and label
//! is already computed by the navigator.

use std::fmt::Write as _;

use rankpage_core::{FilterRow, NavigationView, ResultRow};

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn breadcrumb_text(view: &NavigationView) -> String {
    view.breadcrumb
        .iter()
        .map(|f| format!("{}={}", f.attribute, f.value))
        .collect::<Vec<_>>()
        .join(&format!(" {} ", view.labels.separator))
}

// ============================================================================
// Text
// ============================================================================

pub fn text(view: &NavigationView, title: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(title) = title {
        let _ = writeln!(out, "{title}\n");
    }
    if !view.breadcrumb.is_empty() {
        let _ = writeln!(out, "{}: {}\n", view.labels.navigation, breadcrumb_text(view));
    }
    for inert in &view.inert {
        let _ = writeln!(out, "ignored: {}={} ({})", inert.attribute, inert.value, inert.reason);
    }
    if !view.inert.is_empty() {
        out.push('\n');
    }

    let _ = writeln!(out, "{}:", view.labels.parameters);
    for row in &view.filters {
        let options: Vec<String> = row
            .options
            .iter()
            .map(|o| {
                if o.active {
                    format!("*{}*", o.label)
                } else {
                    o.label.clone()
                }
            })
            .collect();
        let separator = format!(" {} ", view.labels.separator);
        let _ = writeln!(out, "  {}: {}", row.label, options.join(&separator));
    }

    let _ = writeln!(out, "\n{}:", view.labels.results);
    for result in &view.results {
        match result.percent {
            Some(percent) => {
                let _ = writeln!(out, "  {percent:>3}%  {}", result.entity);
            }
            None => {
                let _ = writeln!(out, "  {}", result.entity);
            }
        }
    }
    out
}

// ============================================================================
// HTML
// ============================================================================

pub fn html(view: &NavigationView, title: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(title) = title {
        let _ = writeln!(out, "<h1>{}</h1>", escape_html(title));
    }
    if !view.breadcrumb.is_empty() {
        let _ = writeln!(
            out,
            "<div class=\"bottomspace\">{}: {}</div>",
            escape_html(&view.labels.navigation),
            escape_html(&breadcrumb_text(view))
        );
    }
    out.push_str(&filters_table(view));
    out.push_str(&results_table(view));
    out
}

fn filters_table(view: &NavigationView) -> String {
    let mut out = String::new();
    out.push_str("<table cellspacing=\"0\" class=\"filterstable\">\n");
    let _ = writeln!(
        out,
        "<tr> <th>{}:</th> </tr>",
        escape_html(&view.labels.parameters)
    );
    let separator = format!(" {} ", escape_html(&view.labels.separator));
    for row in &view.filters {
        let _ = writeln!(
            out,
            "<tr> <td>{}</td> <td>{}</td> </tr>",
            category_cell(row),
            option_links(row).join(&separator)
        );
    }
    out.push_str("</table>\n");
    out
}

fn category_cell(row: &FilterRow) -> String {
    let label = escape_html(&row.label);
    match &row.category_link {
        Some(href) => format!("<a href=\"{}\">{label}</a>", escape_html(href)),
        None => label,
    }
}

fn option_links(row: &FilterRow) -> Vec<String> {
    row.options
        .iter()
        .map(|o| {
            let class = if o.active { " class=\"activeoption\"" } else { "" };
            format!(
                "<a href='?{}'{class}>{}</a>",
                escape_html(&o.next_query),
                escape_html(&o.label)
            )
        })
        .collect()
}

fn results_table(view: &NavigationView) -> String {
    let mut out = String::new();
    out.push_str("<table cellspacing=\"0\" class=\"resultstable\">\n");
    let _ = writeln!(out, "<tr> <th>{}:</th> </tr>", escape_html(&view.labels.results));
    for result in &view.results {
        let percent = result
            .percent
            .map(|p| format!("{p}%"))
            .unwrap_or_default();
        let gallery = mini_gallery(result);
        let _ = writeln!(
            out,
            "<tr> <td>{}</td> <td>{percent}</td> {gallery}</tr>",
            entity_cell(result)
        );
    }
    out.push_str("</table>\n");
    out
}

fn entity_cell(result: &ResultRow) -> String {
    let entity = escape_html(&result.entity);
    match &result.detail_link {
        Some(href) => format!("<a href=\"{}\">{entity}</a>", escape_html(href)),
        None => entity,
    }
}

fn mini_gallery(result: &ResultRow) -> String {
    if result.gallery.is_empty() {
        return String::new();
    }
    let images: String = result
        .gallery
        .iter()
        .map(|src| {
            let src = escape_html(src);
            format!("<a href=\"{src}\"><img src=\"{src}\"></a>")
        })
        .collect();
    format!("<td><div class='minigallery'>{images}</div></td> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankpage_core::{
        Dataset, Navigator, NavigatorConfig, SelectionState, Translations, ValueDomains,
        WeightTable,
    };

    fn navigator() -> Navigator {
        let domains: ValueDomains = [
            ("species", vec!["cat".to_string(), "dog".to_string()]),
            ("color", vec!["".to_string(), "black & white".to_string()]),
        ]
        .into_iter()
        .collect();
        let mut weights = WeightTable::new();
        weights.insert("cat", "color", "black & white", 1.0);
        weights.insert("cat", "color", "", 0.0);
        weights.insert("dog", "color", "black & white", 0.0);
        weights.insert("dog", "color", "", 1.0);
        let mut dataset = Dataset {
            answer_attribute: "species".to_string(),
            domains,
            weights,
            ..Dataset::default()
        };
        dataset
            .links
            .photos
            .insert("cat".to_string(), vec!["img/cat.jpg".to_string()]);
        Navigator::new(dataset, NavigatorConfig::default(), Translations::new()).unwrap()
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn html_marks_active_option_and_links_next_state() {
        let nav = navigator();
        let view = nav
            .navigate(&SelectionState::from_query_string("color=black+%26+white"))
            .unwrap();
        let page = html(&view, Some("Pets"));
        assert!(page.contains("<h1>Pets</h1>"));
        assert!(page.contains("<a href='?' class=\"activeoption\">black &amp; white</a>"));
        assert!(page.contains("<a href='?color='>[empty]</a>"));
        assert!(page.contains("<td>100%</td>"));
        assert!(page.contains("<div class='minigallery'><a href=\"img/cat.jpg\"><img src=\"img/cat.jpg\"></a></div>"));
    }

    #[test]
    fn unranked_html_has_empty_percent_cells() {
        let view = navigator().navigate(&SelectionState::new()).unwrap();
        let page = html(&view, None);
        assert!(page.contains("<tr> <td>dog</td> <td></td> </tr>"));
        assert!(!page.contains("%</td>"));
        assert!(!page.contains("bottomspace"));
    }

    #[test]
    fn text_lists_ranked_results() {
        let nav = navigator();
        let view = nav
            .navigate(&SelectionState::from_pairs([("color", "")]))
            .unwrap();
        let out = text(&view, None);
        assert!(out.contains("navigation: color="));
        assert!(out.contains("*[empty]*"));
        assert!(out.contains("100%  dog"));
        assert!(out.contains("  0%  cat"));
    }
}
