use super::{DocumentRenderer, RenderedDocument};
use crate::error::RenderError;
use async_trait::async_trait;
use rollbook_types::{MemberRecord, Page};
use std::fmt::Write;

const STYLE: &str = "\
body{font-family:sans-serif;font-size:10pt;margin:0}\
.page{page-break-after:always;padding:12mm}\
.page:last-child{page-break-after:auto}\
h1{font-size:14pt;margin:0}h2{font-size:12pt;margin:2mm 0 4mm}\
table{width:100%;border-collapse:collapse;margin-bottom:3mm}\
th,td{text-align:left;padding:1mm 2mm;border-bottom:1px solid #ccc}\
th.group{background:#eee}\
.totals{margin-top:4mm;font-weight:bold}";

const COLUMNS: [&str; 5] = ["Name", "Address", "City", "Party", "Position"];

/// Print-ready HTML: one `.page` block per laid-out page, breaking between
/// pages. Each group starts with its election-district header row. A
/// section's final page closes with per-district subtotals and the section
/// total.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRosterRenderer;

#[async_trait]
impl DocumentRenderer for HtmlRosterRenderer {
    async fn render_roster(
        &self,
        title: &str,
        pages: &[Page<MemberRecord>],
    ) -> Result<RenderedDocument, RenderError> {
        Ok(RenderedDocument {
            bytes: render_pages(title, pages).into_bytes(),
            content_type: "text/html; charset=utf-8",
            extension: "html",
        })
    }
}

fn render_pages(title: &str, pages: &[Page<MemberRecord>]) -> String {
    let mut out = String::with_capacity(4096 + pages.len() * 2048);
    let title = escape(title);
    // Writing into a String never fails.
    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title><style>{STYLE}</style></head><body>"
    );

    // Members per group over the pages of the section seen so far.
    let mut subtotals: Vec<(&str, usize)> = Vec::new();
    for (number, page) in pages.iter().enumerate() {
        let section = escape(&page.section_key);
        let _ = write!(
            out,
            "<section class=\"page\" data-page=\"{}\"><h1>{title}</h1><h2>{section}</h2>",
            number + 1
        );

        for group in &page.groups {
            let continues = subtotals.last().is_some_and(|(key, _)| *key == group.key);
            if continues {
                if let Some((_, count)) = subtotals.last_mut() {
                    *count += group.members.len();
                }
            } else {
                subtotals.push((group.key.as_str(), group.members.len()));
            }

            let _ = write!(
                out,
                "<table><thead><tr><th class=\"group\" colspan=\"{}\">{}</th></tr><tr>",
                COLUMNS.len(),
                escape(&group.key)
            );
            for column in COLUMNS {
                let _ = write!(out, "<th>{column}</th>");
            }
            out.push_str("</tr></thead><tbody>");
            for member in &group.members {
                member_row(&mut out, member);
            }
            out.push_str("</tbody></table>");
        }

        if page.is_final_page_of_section {
            out.push_str("<div class=\"totals\"><table><tbody>");
            for (key, count) in subtotals.drain(..) {
                let _ = write!(out, "<tr><td>{}</td><td>{count}</td></tr>", escape(key));
            }
            out.push_str("</tbody></table>");
            if let Some(total) = page.section_total_members {
                let _ = write!(out, "<p>Total members in {section}: {total}</p>");
            }
            out.push_str("</div>");
        }
        out.push_str("</section>");
    }

    out.push_str("</body></html>");
    out
}

fn member_row(out: &mut String, member: &MemberRecord) {
    let cells = [
        Some(member.name.as_str()),
        member.address.as_deref(),
        member.city.as_deref(),
        member.party.as_deref(),
        member.position.as_deref(),
    ];
    out.push_str("<tr>");
    for cell in cells {
        let _ = write!(out, "<td>{}</td>", escape(cell.unwrap_or("")));
    }
    out.push_str("</tr>");
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_layout::{LayoutConfig, paginate, sections_from_members};

    fn member(name: &str, ld: &str, ed: &str) -> MemberRecord {
        MemberRecord {
            name: name.into(),
            legislative_district: Some(ld.into()),
            election_district: Some(ed.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>O'Neil & Co</b>"), "&lt;b&gt;O&#39;Neil &amp; Co&lt;/b&gt;");
    }

    #[tokio::test]
    async fn test_renders_one_block_per_page_with_totals() {
        let members: Vec<MemberRecord> = (0..5)
            .map(|i| member(&format!("Member {i}"), "7", "12"))
            .chain(std::iter::once(member("Solo <Jr>", "7", "3")))
            .collect();
        let config = LayoutConfig::new(4).unwrap();
        let pages = paginate(sections_from_members(members), &config);

        let doc = HtmlRosterRenderer
            .render_roster("Committee & Friends", &pages)
            .await
            .unwrap();
        let html = String::from_utf8(doc.bytes).unwrap();

        assert_eq!(doc.extension, "html");
        assert_eq!(html.matches("<section class=\"page\"").count(), pages.len());
        assert!(html.contains("<title>Committee &amp; Friends</title>"));
        assert!(html.contains("Solo &lt;Jr&gt;"));
        assert_eq!(html.matches("Total members in LD 07: 6").count(), 1);
        assert!(html.contains("<tr><td>ED 003</td><td>1</td></tr>"));
        assert!(html.contains("<tr><td>ED 012</td><td>5</td></tr>"));
    }
}
