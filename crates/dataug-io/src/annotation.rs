use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use dataug_image::Rect;

use crate::{
    error::IoError,
    functional::{has_image_extension, list_image_files},
};

/// Separator between the fields of an annotation line.
pub const DEFAULT_SEPARATOR: &str = " ";

/// An image path and the rectangles labeled on it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotatedImage {
    /// Path to the image file.
    pub path: PathBuf,
    /// Labeled regions. Empty means the whole image.
    pub rects: Vec<Rect>,
}

impl AnnotatedImage {
    /// An image without labeled regions.
    pub fn whole(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rects: Vec::new(),
        }
    }
}

// leading sign and digits, anything after them is ignored and garbage reads as 0
fn parse_int_lenient(token: &str) -> i32 {
    let token = token.trim_start();
    let (sign, digits) = match token.as_bytes().first() {
        Some(b'-') => (-1i64, &token[1..]),
        Some(b'+') => (1, &token[1..]),
        _ => (1, token),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + (b - b'0') as i64).min(i32::MAX as i64 + 1);
    }

    (sign * value).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Parses one line of an annotation file.
///
/// The line holds `path count x y w h [x y w h ...]` separated by single spaces.
/// Returns `None` for lines with fewer than two fields, an empty path or a path
/// containing `#`. At most `count` rectangles are read, and only as long as the
/// line holds four more fields.
///
/// # Examples
///
/// ```
/// use dataug_image::Rect;
/// use dataug_io::annotation::parse_annotation_line;
///
/// let entry = parse_annotation_line("img/a.png 1 10 20 30 40").unwrap();
/// assert_eq!(entry.rects, vec![Rect::new(10, 20, 30, 40)]);
/// ```
pub fn parse_annotation_line(line: &str) -> Option<AnnotatedImage> {
    let line = line.trim_end_matches(['\r', '\n']);
    let tokens: Vec<&str> = line.split(DEFAULT_SEPARATOR).collect();
    if tokens.len() < 2 {
        return None;
    }

    let path = tokens[0];
    if path.is_empty() || path.contains('#') {
        return None;
    }

    let count = parse_int_lenient(tokens[1]).max(0) as usize;
    let rects = tokens[2..]
        .chunks_exact(4)
        .take(count)
        .map(|f| {
            Rect::new(
                parse_int_lenient(f[0]),
                parse_int_lenient(f[1]),
                parse_int_lenient(f[2]),
                parse_int_lenient(f[3]),
            )
        })
        .collect();

    Some(AnnotatedImage {
        path: PathBuf::from(path),
        rects,
    })
}

/// Reads all the entries of an annotation file, skipping malformed lines.
pub fn read_annotation_file(file_path: impl AsRef<Path>) -> Result<Vec<AnnotatedImage>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let content = std::fs::read_to_string(file_path)?;
    let entries: Vec<_> = content.lines().filter_map(parse_annotation_line).collect();

    log::debug!(
        "read {} annotated images from {}",
        entries.len(),
        file_path.display()
    );

    Ok(entries)
}

/// Formats an annotation line, without the line terminator.
///
/// # Examples
///
/// ```
/// use dataug_image::Rect;
/// use dataug_io::annotation::format_annotation_line;
///
/// let line = format_annotation_line("out/img0_0_0.png", &[Rect::new(0, 0, 40, 40)], " ");
/// assert_eq!(line, "out/img0_0_0.png 1 0 0 40 40");
/// ```
pub fn format_annotation_line(path: impl AsRef<Path>, rects: &[Rect], sep: &str) -> String {
    let mut line = format!("{}{sep}{}", path.as_ref().display(), rects.len());
    for r in rects {
        line.push_str(&format!(
            "{sep}{}{sep}{}{sep}{}{sep}{}",
            r.x, r.y, r.width, r.height
        ));
    }
    line
}

/// Appends one annotation line to `file_path`, creating the file if needed.
pub fn append_annotation_line(
    file_path: impl AsRef<Path>,
    image_path: impl AsRef<Path>,
    rects: &[Rect],
    sep: &str,
) -> Result<(), IoError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file_path)?;
    writeln!(file, "{}", format_annotation_line(image_path, rects, sep))?;
    Ok(())
}

/// Resolves the input of an augmentation run.
///
/// * a directory gives all the image files inside it, unlabeled;
/// * a path with an image extension gives that single image, unlabeled;
/// * anything else is read as an annotation file.
pub fn resolve_inputs(input: impl AsRef<Path>) -> Result<Vec<AnnotatedImage>, IoError> {
    let input = input.as_ref();

    if input.is_dir() {
        let files = list_image_files(input)?;
        return Ok(files.into_iter().map(AnnotatedImage::whole).collect());
    }

    if has_image_extension(input) {
        return Ok(vec![AnnotatedImage::whole(input)]);
    }

    read_annotation_file(input)
}
