//! Construction of the required TrueType tables.

use chrono::{DateTime, Utc};
use font_types::{FWord, Fixed, LongDateTime, NameId, Tag, UfWord};
use write_fonts::tables::{
    glyf::Glyph,
    head::{Flags, Head, MacStyle},
    hhea::Hhea,
    hmtx::{Hmtx, LongMetric},
    loca::LocaFormat,
    maxp::Maxp,
    name::{Name, NameRecord},
    os2::{Os2, SelectionFlags},
    post::Post,
};

use crate::{FontInfo, GlyphSet};

/// Seconds between 1904-01-01 (the `head` epoch) and 1970-01-01.
const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;

// Windows, Unicode BMP, US English.
const PLATFORM_WINDOWS: u16 = 3;
const ENCODING_UNICODE_BMP: u16 = 1;
const LANGUAGE_EN_US: u16 = 0x409;

const NAME_ID_COPYRIGHT: u16 = 0;
const NAME_ID_FAMILY: u16 = 1;
const NAME_ID_SUBFAMILY: u16 = 2;
const NAME_ID_UNIQUE_ID: u16 = 3;
const NAME_ID_FULL_NAME: u16 = 4;
const NAME_ID_VERSION: u16 = 5;
const NAME_ID_POSTSCRIPT: u16 = 6;

/// Horizontal metrics and bounds aggregated over every glyph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphStats {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    pub x_max_extent: i16,
    pub avg_char_width: i16,
    pub max_points: u16,
    pub max_contours: u16,
}

impl GlyphStats {
    pub fn collect(glyphs: &GlyphSet) -> Self {
        let mut stats = Self::default();
        let mut inked = false;
        let mut advance_sum = 0u64;
        let mut advance_count = 0u64;

        for entry in glyphs.entries() {
            stats.advance_width_max = stats.advance_width_max.max(entry.advance_width);
            if entry.advance_width > 0 {
                advance_sum += u64::from(entry.advance_width);
                advance_count += 1;
            }
            stats.max_points =
                stats.max_points.max(entry.num_points().min(usize::from(u16::MAX)) as u16);
            stats.max_contours =
                stats.max_contours.max(entry.num_contours().min(usize::from(u16::MAX)) as u16);

            let Glyph::Simple(simple) = &entry.glyph else {
                continue;
            };
            let bbox = &simple.bbox;
            let rsb = i32::from(entry.advance_width) - i32::from(bbox.x_max);
            let rsb = rsb.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;

            if inked {
                stats.x_min = stats.x_min.min(bbox.x_min);
                stats.y_min = stats.y_min.min(bbox.y_min);
                stats.x_max = stats.x_max.max(bbox.x_max);
                stats.y_max = stats.y_max.max(bbox.y_max);
                stats.min_left_side_bearing = stats.min_left_side_bearing.min(bbox.x_min);
                stats.min_right_side_bearing = stats.min_right_side_bearing.min(rsb);
                stats.x_max_extent = stats.x_max_extent.max(bbox.x_max);
            } else {
                stats.x_min = bbox.x_min;
                stats.y_min = bbox.y_min;
                stats.x_max = bbox.x_max;
                stats.y_max = bbox.y_max;
                stats.min_left_side_bearing = bbox.x_min;
                stats.min_right_side_bearing = rsb;
                stats.x_max_extent = bbox.x_max;
                inked = true;
            }
        }

        if advance_count > 0 {
            stats.avg_char_width = (advance_sum / advance_count).min(i16::MAX as u64) as i16;
        }
        stats
    }
}

/// `head` timestamp for `time`.
pub fn long_date_time(time: DateTime<Utc>) -> LongDateTime {
    LongDateTime::new(time.timestamp() + MAC_EPOCH_OFFSET)
}

pub fn build_head(
    info: &FontInfo,
    stats: &GlyphStats,
    loca_format: LocaFormat,
    timestamp: DateTime<Utc>,
) -> Head {
    Head {
        font_revision: info.version.revision(),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        // Baseline at y=0
        flags: Flags::from_bits_truncate(0x0001),
        units_per_em: info.metrics.units_per_em,
        created: long_date_time(timestamp),
        modified: long_date_time(timestamp),
        x_min: stats.x_min,
        y_min: stats.y_min,
        x_max: stats.x_max,
        y_max: stats.y_max,
        mac_style: MacStyle::empty(),
        lowest_rec_ppem: 8,
        font_direction_hint: 2,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
    }
}

pub fn build_hhea(info: &FontInfo, stats: &GlyphStats, num_glyphs: u16) -> Hhea {
    Hhea {
        ascender: FWord::new(info.metrics.ascender),
        descender: FWord::new(info.metrics.descender),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(stats.advance_width_max),
        min_left_side_bearing: FWord::new(stats.min_left_side_bearing),
        min_right_side_bearing: FWord::new(stats.min_right_side_bearing),
        x_max_extent: FWord::new(stats.x_max_extent),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: num_glyphs,
    }
}

pub fn build_hmtx(glyphs: &GlyphSet) -> Hmtx {
    let h_metrics = glyphs
        .entries()
        .map(|entry| LongMetric {
            advance: entry.advance_width,
            side_bearing: entry.left_side_bearing(),
        })
        .collect();
    Hmtx::new(h_metrics, vec![])
}

pub fn build_maxp(stats: &GlyphStats, num_glyphs: u16) -> Maxp {
    Maxp {
        num_glyphs,
        max_points: Some(stats.max_points),
        max_contours: Some(stats.max_contours),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    }
}

/// OS/2 version 4.
pub fn build_os2(
    info: &FontInfo,
    stats: &GlyphStats,
    codepoints: (u16, u16),
    max_context: u16,
) -> Os2 {
    let metrics = &info.metrics;
    let em = i32::from(metrics.units_per_em);
    let scaled = |num: i32, den: i32| (em * num / den) as i16;
    let (first_char, last_char) = codepoints;

    Os2 {
        x_avg_char_width: stats.avg_char_width,
        us_weight_class: 400,
        us_width_class: 5,
        fs_type: 0,
        y_subscript_x_size: scaled(65, 100),
        y_subscript_y_size: scaled(60, 100),
        y_subscript_x_offset: 0,
        y_subscript_y_offset: scaled(75, 1000),
        y_superscript_x_size: scaled(65, 100),
        y_superscript_y_size: scaled(60, 100),
        y_superscript_x_offset: 0,
        y_superscript_y_offset: scaled(35, 100),
        y_strikeout_size: scaled(5, 100),
        y_strikeout_position: scaled(30, 100),
        s_family_class: 0,
        panose_10: [0; 10],
        // Basic Latin
        ul_unicode_range_1: 1,
        ul_unicode_range_2: 0,
        ul_unicode_range_3: 0,
        ul_unicode_range_4: 0,
        ach_vend_id: Tag::new(b"NONE"),
        fs_selection: SelectionFlags::REGULAR,
        us_first_char_index: first_char,
        us_last_char_index: last_char,
        s_typo_ascender: metrics.ascender,
        s_typo_descender: metrics.descender,
        s_typo_line_gap: 0,
        us_win_ascent: metrics.ascender.max(stats.y_max).max(0) as u16,
        us_win_descent: (-i32::from(metrics.descender.min(stats.y_min))).max(0) as u16,
        // Latin 1
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(0),
        s_cap_height: Some(metrics.ascender),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(max_context),
        us_lower_optical_point_size: None,
        us_upper_optical_point_size: None,
    }
}

/// `post` version 2 carrying every glyph name.
pub fn build_post(glyphs: &GlyphSet) -> Post {
    let mut post = Post::new_v2(glyphs.names());
    post.italic_angle = Fixed::from_f64(0.0);
    post.underline_position = FWord::new(-100);
    post.underline_thickness = FWord::new(50);
    post
}

pub fn build_name(info: &FontInfo) -> Name {
    let unique_id = format!("{};NONE;{}", info.version.tag, info.postscript_name);
    let version = info.version.version_string();
    let entries = [
        (NAME_ID_COPYRIGHT, info.copyright.as_str()),
        (NAME_ID_FAMILY, info.family_name.as_str()),
        (NAME_ID_SUBFAMILY, info.style_name.as_str()),
        (NAME_ID_UNIQUE_ID, unique_id.as_str()),
        (NAME_ID_FULL_NAME, info.full_name.as_str()),
        (NAME_ID_VERSION, version.as_str()),
        (NAME_ID_POSTSCRIPT, info.postscript_name.as_str()),
    ];

    let records = entries
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name_id, value)| {
            NameRecord::new(
                PLATFORM_WINDOWS,
                ENCODING_UNICODE_BMP,
                LANGUAGE_EN_US,
                NameId::new(name_id),
                value.to_string().into(),
            )
        })
        .collect();
    Name::new(records)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use kurbo::{Rect, Shape};

    use super::*;
    use crate::{GlyphEntry, glyphs::glyph_from_path};

    fn glyph_set() -> GlyphSet {
        let mut set = GlyphSet::new();
        set.insert(".notdef", GlyphEntry { advance_width: 0, codepoint: None, glyph: Glyph::Empty })
            .unwrap();
        let bars = [("a", 100.0, 300.0, 500), ("b", -20.0, 640.0, 600)];
        for (name, x0, x1, advance_width) in bars {
            let path = Rect::new(x0, -100.0, x1, 800.0).to_path(0.1);
            let glyph = glyph_from_path(name, &path).unwrap();
            set.insert(name, GlyphEntry { advance_width, codepoint: None, glyph }).unwrap();
        }
        set
    }

    #[test]
    fn test_glyph_stats() {
        let stats = GlyphStats::collect(&glyph_set());
        assert_eq!((stats.x_min, stats.y_min, stats.x_max, stats.y_max), (-20, -100, 640, 800));
        assert_eq!(stats.advance_width_max, 600);
        assert_eq!(stats.min_left_side_bearing, -20);
        assert_eq!(stats.min_right_side_bearing, -40);
        assert_eq!(stats.x_max_extent, 640);
        assert_eq!(stats.avg_char_width, 550);
        assert_eq!((stats.max_points, stats.max_contours), (4, 1));
    }

    #[test]
    fn test_empty_glyph_set_stats() {
        assert_eq!(GlyphStats::collect(&GlyphSet::new()), GlyphStats::default());
    }

    #[test]
    fn test_long_date_time_epoch() {
        let unix_epoch = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(long_date_time(unix_epoch), LongDateTime::new(MAC_EPOCH_OFFSET));
    }

    #[test]
    fn test_hmtx_side_bearings() {
        let hmtx = build_hmtx(&glyph_set());
        let bearings: Vec<_> =
            hmtx.h_metrics.iter().map(|m| (m.advance, m.side_bearing)).collect();
        assert_eq!(bearings, [(0, 0), (500, 100), (600, -20)]);
    }
}
