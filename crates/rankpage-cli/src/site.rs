//! Static site generation.
//!
//! A site is an `index.html` with the unfiltered view, one detail page per
//! entity (`<subpage_dir>/match_<n>.html`) and one category page per filter
//! attribute (`<subpage_dir>/category_<n>.html`). The dataset's link tables
//! are rebuilt from the pages that are actually generated, and the bundle is
//! written next to the index so `navigate` renders the same links.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rankpage_core::translation::{GROUP_CATEGORY, KEY_EMPTY};
use rankpage_core::{LinkTables, Navigator, SelectionState, Translations};
use rankpage_ingest::{DatasetBundle, Model};
use tracing::{debug, info};

use crate::render::{self, escape_html};

pub const DEFAULT_SUBPAGE_DIR: &str = "pages";
pub const BUNDLE_FILE: &str = "bundle.json";

const KEY_BACK: &str = "Back to Filters";
const KEY_RESET: &str = "Reset filters";
const KEY_PREV: &str = "Prev";
const KEY_NEXT: &str = "Next";
const KEY_PHOTOS: &str = "Photos";
const KEY_PARAMETER: &str = "Parameter";
const KEY_VALUE: &str = "Value";

/// One generated file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct Site {
    pub pages: Vec<Page>,
    pub bundle: DatasetBundle,
}

impl Site {
    #[cfg(test)]
    pub fn page(&self, path: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.path == Path::new(path))
    }

    /// Write every page and the bundle under `outdir`.
    pub fn write(&self, outdir: &Path) -> Result<()> {
        for page in &self.pages {
            let path = outdir.join(&page.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(&path, &page.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            debug!(path = %path.display(), "wrote page");
        }
        self.bundle.write(&outdir.join(BUNDLE_FILE))?;
        info!(outdir = %outdir.display(), pages = self.pages.len(), "site generated");
        Ok(())
    }
}

/// Answer value of every model row, in row order.
fn entities(model: &Model) -> Vec<String> {
    let Some(index) = model.column_index(&model.answer) else {
        return Vec::new();
    };
    model
        .rows
        .iter()
        .map(|row| {
            row.get(index)
                .and_then(|cell| cell.first())
                .map(ToString::to_string)
                .unwrap_or_default()
        })
        .collect()
}

fn detail_page_path(subpage_dir: &str, index: usize) -> String {
    format!("{subpage_dir}/match_{index}.html")
}

fn category_page_path(subpage_dir: &str, index: usize) -> String {
    format!("{subpage_dir}/category_{index}.html")
}

/// Link tables pointing at the generated pages. Photos are kept from the model.
pub fn site_links(model: &Model, subpage_dir: &str) -> LinkTables {
    let mut links = LinkTables {
        photos: model.links.photos.clone(),
        ..LinkTables::default()
    };
    for (index, entity) in entities(model).into_iter().enumerate() {
        links
            .details
            .entry(entity)
            .or_insert_with(|| detail_page_path(subpage_dir, index));
    }
    for (index, column) in model.filter_columns().enumerate() {
        links
            .categories
            .insert(column.to_string(), category_page_path(subpage_dir, index));
    }
    links
}

pub fn build_site(model: &Model, translations: Translations, subpage_dir: &str) -> Result<Site> {
    let mut bundle = DatasetBundle::from_model(model, translations)?;
    bundle.dataset.links = site_links(model, subpage_dir);

    let builder = SiteBuilder {
        model,
        translations: &bundle.translations,
        links: &bundle.dataset.links,
        title: bundle.page_title.as_deref(),
        entities: entities(model),
    };

    let mut pages = Vec::new();
    for index in 0..builder.entities.len() {
        pages.push(Page {
            path: PathBuf::from(detail_page_path(subpage_dir, index)),
            content: builder.detail_page(index),
        });
    }
    for (index, column) in model.filter_columns().enumerate() {
        pages.push(Page {
            path: PathBuf::from(category_page_path(subpage_dir, index)),
            content: builder.category_page(column),
        });
    }

    let navigator = Navigator::new(
        bundle.dataset.clone(),
        bundle.config.clone(),
        bundle.translations.clone(),
    )?;
    let view = navigator.navigate(&SelectionState::new())?;
    let body = format!(
        "<div class=\"bottomspace\">\n<a href='?'>{}</a>\n</div>\n{}",
        escape_html(&builder.label(KEY_RESET)),
        render::html(&view, bundle.page_title.as_deref())
    );
    pages.insert(
        0,
        Page {
            path: PathBuf::from("index.html"),
            content: document(bundle.page_title.as_deref(), "mainpage", &body),
        },
    );

    Ok(Site { pages, bundle })
}

fn document(title: Option<&str>, body_class: &str, body: &str) -> String {
    let title = title
        .map(|t| format!("<title>{}</title>\n", escape_html(t)))
        .unwrap_or_default();
    format!("<html>\n<head>\n{title}</head>\n<body class=\"{body_class}\">\n{body}</body>\n</html>\n")
}

struct SiteBuilder<'a> {
    model: &'a Model,
    translations: &'a Translations,
    links: &'a LinkTables,
    title: Option<&'a str>,
    entities: Vec<String>,
}

impl SiteBuilder<'_> {
    fn label(&self, key: &str) -> String {
        self.translations.get(key, None)
    }

    fn category_label(&self, key: &str) -> String {
        self.translations.get(key, Some(GROUP_CATEGORY))
    }

    fn subpage_title(&self, prefix: &str) -> Option<String> {
        self.title.map(|title| format!("{prefix} - {title}"))
    }

    fn back_link(&self) -> String {
        format!(
            "<a href=\"../index.html\">{}</a>",
            escape_html(&self.label(KEY_BACK))
        )
    }

    fn detail_page(&self, index: usize) -> String {
        let entity = &self.entities[index];
        let row = &self.model.rows[index];

        let mut table = String::new();
        table.push_str("<table class='detailstable'>\n");
        let _ = writeln!(
            table,
            "<tr> <th>{}:</th> <th>{}:</th> </tr>",
            escape_html(&self.label(KEY_PARAMETER)),
            escape_html(&self.label(KEY_VALUE))
        );
        for (column, cell) in self.model.columns.iter().zip(row) {
            let mut values: Vec<String> = cell.iter().map(ToString::to_string).collect();
            values.sort();
            values.retain(|v| !v.is_empty());
            let shown = if values.is_empty() {
                format!(
                    "<span class=\"empty\">[{}]</span>",
                    escape_html(&self.label(KEY_EMPTY))
                )
            } else {
                escape_html(&values.join(", "))
            };
            let _ = writeln!(
                table,
                "<tr> <td>{}</td> <td>{shown}</td> </tr>",
                escape_html(&self.category_label(column))
            );
        }
        table.push_str("</table>\n");

        let neighbour = |target: Option<usize>, key: &str| {
            let label = escape_html(&self.label(key));
            match target {
                Some(n) => format!("<a href=\"match_{n}.html\">{label}</a>"),
                None => label,
            }
        };
        let prev = neighbour(index.checked_sub(1), KEY_PREV);
        let next = neighbour(
            Some(index + 1).filter(|n| *n < self.entities.len()),
            KEY_NEXT,
        );

        let body = format!(
            "<div>\n{}\n</div>\n<div class=\"bottomspace\">\n<span>{prev}</span> <span>{next}</span>\n</div>\n<div class=\"characteristics bottomspace\">\n{table}</div>\n{}",
            self.back_link(),
            self.photo_gallery(entity)
        );
        document(self.subpage_title(entity).as_deref(), "details", &body)
    }

    fn photo_gallery(&self, entity: &str) -> String {
        let photos = self.links.gallery(entity);
        if photos.is_empty() {
            return String::new();
        }
        let mut out = String::from("<div class=\"photogallery bottomspace\">\n");
        let _ = writeln!(
            out,
            "<div class=\"photostitle\">{}:</div>",
            escape_html(&self.label(KEY_PHOTOS))
        );
        for photo in photos {
            let src = escape_html(&format!("../{photo}"));
            let _ = writeln!(
                out,
                "<div class=\"imgtile\"><a href=\"{src}\"><img src=\"{src}\"></a></div>"
            );
        }
        out.push_str("</div>\n");
        out
    }

    /// Every value of `column` with the entities holding it.
    fn category_page(&self, column: &str) -> String {
        let Some(column_index) = self.model.column_index(column) else {
            return document(self.subpage_title(column).as_deref(), "categories", "");
        };

        let mut table = String::from("<table cellspacing=\"0\" class=\"categoriestable\">\n");
        let _ = writeln!(
            table,
            "<tr> <th>{}:</th> </tr>",
            escape_html(&self.category_label(column))
        );
        for (value_index, value) in self.model.domain(column).iter().enumerate() {
            let holders: Vec<&str> = self
                .model
                .rows
                .iter()
                .zip(&self.entities)
                .filter(|(row, _)| row.get(column_index).is_some_and(|cell| cell.contains(value)))
                .map(|(_, entity)| entity.as_str())
                .collect();
            let value_cell = escape_html(&self.category_label(&value.to_string()));

            if holders.is_empty() {
                let _ = writeln!(
                    table,
                    "<tr class=\"{}\"> <td rowspan='1'>{value_cell}</td> <td></td> <td></td> </tr>",
                    row_class(value_index)
                );
                continue;
            }
            for (holder_index, entity) in holders.iter().enumerate() {
                let first = if holder_index == 0 {
                    format!("<td rowspan='{}'>{value_cell}</td> ", holders.len())
                } else {
                    String::new()
                };
                let _ = writeln!(
                    table,
                    "<tr class=\"{}\"> {first}<td>{}</td> <td>{}</td> </tr>",
                    row_class(value_index + holder_index),
                    self.entity_link(entity),
                    self.mini_gallery(entity)
                );
            }
        }
        table.push_str("</table>\n");

        let body = format!(
            "<div class=\"bottomspace\">\n{}\n</div>\n<div class=\"categories bottomspace\">\n{table}</div>\n",
            self.back_link()
        );
        document(self.subpage_title(column).as_deref(), "categories", &body)
    }

    fn entity_link(&self, entity: &str) -> String {
        let name = escape_html(entity);
        match self.links.detail(entity) {
            Some(href) => format!("<a href=\"../{}\">{name}</a>", escape_html(href)),
            None => name,
        }
    }

    fn mini_gallery(&self, entity: &str) -> String {
        let photos = self.links.gallery(entity);
        if photos.is_empty() {
            return String::new();
        }
        let images: String = photos
            .iter()
            .map(|photo| {
                let src = escape_html(&format!("../{photo}"));
                format!("<a href=\"{src}\"><img src=\"{src}\"></a>")
            })
            .collect();
        format!("<div class='minigallery'>{images}</div>")
    }
}

fn row_class(n: usize) -> &'static str {
    if n % 2 == 0 {
        "roweven"
    } else {
        "rowodd"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankpage_ingest::parse_model;

    const MODEL: &str = r#"{
        "config": {"answer_column": "species", "page_title": "Pets"},
        "data_types": {"color": "str list"},
        "data": {
            "columns": ["species", "color", "size"],
            "rows": [["cat", "white, black", "small"], ["dog", "black", "large"], ["fish", "", "small"]]
        },
        "links": {"details": {"cat": "custom/cat.html"}},
        "photos": {"cat": ["img/cat.jpg"]}
    }"#;

    fn site() -> Site {
        let model = parse_model(MODEL).unwrap();
        build_site(&model, Translations::new(), DEFAULT_SUBPAGE_DIR).unwrap()
    }

    #[test]
    fn links_point_at_generated_pages() {
        let site = site();
        let links = &site.bundle.dataset.links;
        assert_eq!(links.detail("cat"), Some("pages/match_0.html"));
        assert_eq!(links.detail("fish"), Some("pages/match_2.html"));
        assert_eq!(links.category("color"), Some("pages/category_0.html"));
        assert_eq!(links.category("size"), Some("pages/category_1.html"));
        assert_eq!(links.category("species"), None);
        for href in links.details.values().chain(links.categories.values()) {
            assert!(site.page(href).is_some(), "no page for {href}");
        }
    }

    #[test]
    fn index_renders_unfiltered_view_with_site_links() {
        let site = site();
        let index = &site.page("index.html").unwrap().content;
        assert!(index.contains("<title>Pets</title>"));
        assert!(index.contains("<a href=\"pages/match_1.html\">dog</a>"));
        assert!(index.contains("<a href=\"pages/category_1.html\">size</a>"));
        assert!(index.contains("Reset filters"));
    }

    #[test]
    fn detail_pages_chain_and_list_characteristics() {
        let site = site();
        let first = &site.page("pages/match_0.html").unwrap().content;
        assert!(first.contains("<title>cat - Pets</title>"));
        assert!(first.contains("<span>Prev</span> <span><a href=\"match_1.html\">Next</a></span>"));
        assert!(first.contains("<tr> <td>color</td> <td>black, white</td> </tr>"));
        assert!(first.contains("<img src=\"../img/cat.jpg\">"));

        let last = &site.page("pages/match_2.html").unwrap().content;
        assert!(last.contains("<span><a href=\"match_1.html\">Prev</a></span> <span>Next</span>"));
        assert!(last.contains("<span class=\"empty\">[empty]</span>"));
    }

    #[test]
    fn category_pages_group_entities_by_value() {
        let site = site();
        let size = &site.page("pages/category_1.html").unwrap().content;
        assert!(size.contains("<td rowspan='1'>large</td> <td><a href=\"../pages/match_1.html\">dog</a></td>"));
        assert!(size.contains("<td rowspan='2'>small</td> <td><a href=\"../pages/match_0.html\">cat</a></td>"));
        assert!(size.contains("<td><a href=\"../pages/match_2.html\">fish</a></td>"));
        assert!(size.contains("<div class='minigallery'><a href=\"../img/cat.jpg\">"));
        assert!(size.contains("<a href=\"../index.html\">Back to Filters</a>"));
    }

    #[test]
    fn site_writes_pages_and_bundle() {
        let dir = tempfile::tempdir().unwrap();
        site().write(dir.path()).unwrap();
        assert!(dir.path().join("index.html").exists());
        assert!(dir.path().join("pages/match_2.html").exists());
        assert!(dir.path().join("pages/category_1.html").exists());
        let bundle = rankpage_ingest::load_bundle(&dir.path().join(BUNDLE_FILE)).unwrap();
        assert_eq!(bundle.dataset.links.detail("dog"), Some("pages/match_1.html"));
    }
}
