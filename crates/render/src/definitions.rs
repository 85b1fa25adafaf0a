//! Definitions that accompany the compiled fragments: automatic styles and
//! list styles for the tree schema, numbering and relationships for the flat
//! schema.
//!
//! Only lists that numbered at least one item are defined.
use itertools::Itertools;
use pressmark_registry::{JobState, ListLevel};

const BULLET_CHARS: [char; 3] = ['•', '◦', '▪'];

/// Indentation step of the tree schema, in centimetres.
const ODT_INDENT_CM: f64 = 0.635;

/// Indentation step and hanging indent of the flat schema, in twips.
const DOCX_INDENT_TWIPS: usize = 720;
const DOCX_HANGING_TWIPS: usize = 360;

/// `office:automatic-styles` children: text styles, then list styles.
pub fn odt_automatic_styles(job: &JobState) -> String {
    let text_styles = job.styles.records().map(|record| record.to_odt_definition());
    let list_styles = job.lists.used_shapes().map(|shape| {
        format!(
            r#"<text:list-style style:name="{}">{}</text:list-style>"#,
            shape.id,
            job.lists.levels_of(shape).map(odt_list_level).join("")
        )
    });
    text_styles.chain(list_styles).join("")
}

fn odt_list_level(level: &ListLevel) -> String {
    let position = ODT_INDENT_CM * (level.depth + 2) as f64;
    let properties = format!(
        concat!(
            r#"<style:list-level-properties text:list-level-position-and-space-mode="label-alignment">"#,
            r#"<style:list-level-label-alignment text:label-followed-by="listtab" text:list-tab-stop-position="{pos:.2}cm" fo:text-indent="-{indent:.3}cm" fo:margin-left="{pos:.2}cm"/>"#,
            r#"</style:list-level-properties>"#
        ),
        pos = position,
        indent = ODT_INDENT_CM
    );
    let level_number = level.depth + 1;
    if level.ordered {
        format!(
            r#"<text:list-level-style-number text:level="{level_number}" style:num-suffix="." style:num-format="1">{properties}</text:list-level-style-number>"#
        )
    } else {
        let bullet = BULLET_CHARS[level_number % BULLET_CHARS.len()];
        format!(
            r#"<text:list-level-style-bullet text:level="{level_number}" text:bullet-char="{bullet}">{properties}</text:list-level-style-bullet>"#
        )
    }
}

/// `w:abstractNum` entries for `word/numbering.xml`.
pub fn docx_abstract_numbers(job: &JobState) -> String {
    job.lists
        .used_shapes()
        .map(|shape| {
            format!(
                r#"<w:abstractNum w:abstractNumId="{}"><w:multiLevelType w:val="hybridMultilevel"/>{}</w:abstractNum>"#,
                shape.id,
                job.lists.levels_of(shape).map(docx_list_level).join("")
            )
        })
        .join("")
}

/// `w:num` entries binding each numbering id to its abstract number.
pub fn docx_nums(job: &JobState) -> String {
    job.lists
        .used_shapes()
        .map(|shape| {
            format!(
                r#"<w:num w:numId="{id}"><w:abstractNumId w:val="{id}"/></w:num>"#,
                id = shape.id
            )
        })
        .join("")
}

fn docx_list_level(level: &ListLevel) -> String {
    let depth = level.depth;
    let indent = format!(
        r#"<w:pPr><w:ind w:left="{}" w:hanging="{DOCX_HANGING_TWIPS}"/></w:pPr>"#,
        DOCX_INDENT_TWIPS + DOCX_INDENT_TWIPS * depth
    );
    let (format, text, run) = if level.ordered {
        let run = if level.font.is_empty() {
            String::new()
        } else {
            format!("<w:rPr>{}</w:rPr>", level.font)
        };
        ("decimal", format!("%{}.", depth + 1), run)
    } else {
        let (glyph, font) = match depth % 3 {
            0 => ('\u{f0b7}', "Symbol"),
            1 => ('o', "Courier New"),
            _ => ('\u{f0a7}', "Wingdings"),
        };
        let run = format!(
            r#"<w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:hint="default"/></w:rPr>"#
        );
        ("bullet", glyph.to_string(), run)
    };
    format!(
        r#"<w:lvl w:ilvl="{depth}"><w:start w:val="1"/><w:numFmt w:val="{format}"/><w:lvlText w:val="{text}"/><w:lvlJc w:val="left"/>{indent}{run}</w:lvl>"#
    )
}

/// `Relationship` entries for hyperlinks and images, in registration order.
pub fn docx_relationships(job: &JobState) -> String {
    let links = job.hyperlinks.iter().map(|link| link.to_relationship());
    let images = job
        .images
        .iter()
        .map(|record| job.images.to_relationship(record));
    links.chain(images).join("")
}
