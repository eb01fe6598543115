//! Shared fixtures for integration tests.
//!
//! Documents are built on the fly as minimal ODT packages: a stored
//! `mimetype` entry first, a manifest, and optional body and styling members.

#![allow(dead_code)]

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

pub const MIMETYPE: &str = "application/vnd.oasis.opendocument.text";

const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" manifest:version="1.2">
 <manifest:file-entry manifest:full-path="/" manifest:media-type="application/vnd.oasis.opendocument.text"/>
 <manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/>
 <manifest:file-entry manifest:full-path="styles.xml" manifest:media-type="text/xml"/>
</manifest:manifest>"#;

/// A text-input field marked as an import block.
pub fn import_field(token: &str) -> String {
    format!(r#"<text:text-input text:description="import">{token}</text:text-input>"#)
}

/// A body member with one paragraph per token.
pub fn content_xml(tokens: &[&str]) -> String {
    let paragraphs: String = tokens
        .iter()
        .map(|token| format!("<text:p>See {}</text:p>", import_field(token)))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" office:version="1.2"><office:body><office:text>{paragraphs}</office:text></office:body></office:document-content>"#
    )
}

/// A styling member whose header and footer hold the given tokens.
pub fn styles_xml(header: &[&str], footer: &[&str]) -> String {
    let fields = |tokens: &[&str]| -> String {
        tokens
            .iter()
            .map(|token| format!("<text:p>{}</text:p>", import_field(token)))
            .collect()
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0"><office:master-styles><style:master-page style:name="Standard"><style:header>{}</style:header><style:footer>{}</style:footer></style:master-page></office:master-styles></office:document-styles>"#,
        fields(header),
        fields(footer)
    )
}

/// Writes an ODT package with the given optional members.
pub fn write_odt(path: &Path, content: Option<&str>, styles: Option<&str>) {
    let mut members = Vec::new();
    if let Some(content) = content {
        members.push(("content.xml", content.as_bytes()));
    }
    if let Some(styles) = styles {
        members.push(("styles.xml", styles.as_bytes()));
    }
    write_package(path, &members);
}

/// Writes an ODT package holding `content.xml` with one import block per token.
pub fn write_simple_odt(path: &Path, tokens: &[&str]) {
    write_odt(path, Some(&content_xml(tokens)), None);
}

/// Writes an ODT package with arbitrary extra members after the manifest.
pub fn write_package(path: &Path, members: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file("mimetype", stored).unwrap();
    writer.write_all(MIMETYPE.as_bytes()).unwrap();
    writer.start_file("META-INF/manifest.xml", deflated).unwrap();
    writer.write_all(MANIFEST.as_bytes()).unwrap();
    for (name, data) in members {
        writer.start_file(*name, deflated).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}

/// Writes an ODT package whose `content.xml` carries zip64 size fields.
pub fn write_zip64_odt(path: &Path, tokens: &[&str]) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    writer.start_file("mimetype", stored).unwrap();
    writer.write_all(MIMETYPE.as_bytes()).unwrap();
    writer
        .start_file("content.xml", stored.large_file(true))
        .unwrap();
    writer.write_all(content_xml(tokens).as_bytes()).unwrap();
    writer.finish().unwrap();
}

/// Overwrites the uncompressed size that the central directory declares for
/// `member`, leaving the stored data intact.
pub fn patch_declared_size(path: &Path, member: &str, size: u64) {
    const CENTRAL_HEADER: [u8; 4] = [0x50, 0x4b, 0x01, 0x02];
    const ZIP64_EXTRA: u16 = 0x0001;

    let mut bytes = std::fs::read(path).unwrap();
    let u16_at = |bytes: &[u8], at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]) as usize;

    let mut at = 0;
    loop {
        at += bytes[at..]
            .windows(4)
            .position(|window| window == CENTRAL_HEADER)
            .expect("central directory entry for member");
        let name_len = u16_at(&bytes, at + 28);
        let extra_len = u16_at(&bytes, at + 30);
        let name_start = at + 46;
        if &bytes[name_start..name_start + name_len] != member.as_bytes() {
            at += 4;
            continue;
        }

        let size_field = at + 24;
        if bytes[size_field..size_field + 4] != [0xff; 4] {
            let small = size.min(u64::from(u32::MAX - 1)) as u32;
            bytes[size_field..size_field + 4].copy_from_slice(&small.to_le_bytes());
            break;
        }

        let mut extra = name_start + name_len;
        let extra_end = extra + extra_len;
        while extra + 4 <= extra_end {
            let id = u16_at(&bytes, extra) as u16;
            let len = u16_at(&bytes, extra + 2);
            if id == ZIP64_EXTRA {
                bytes[extra + 4..extra + 12].copy_from_slice(&size.to_le_bytes());
                break;
            }
            extra += 4 + len;
        }
        break;
    }

    std::fs::write(path, bytes).unwrap();
}

/// Names of every entry, in archive order.
pub fn entry_names(path: &Path) -> Vec<String> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Decompressed bytes of one entry.
pub fn read_entry(path: &Path, name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut data = Vec::new();
    entry.read_to_end(&mut data).unwrap();
    data
}

pub fn compression_of(path: &Path, name: &str) -> CompressionMethod {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive.by_name(name).unwrap().compression()
}

/// Makes a file unreadable; returns false when the current user can still
/// read it (for example when tests run as root), so callers can skip.
#[cfg(unix)]
pub fn make_unreadable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o000)).unwrap();
    if path.is_dir() {
        std::fs::read_dir(path).is_err()
    } else {
        File::open(path).is_err()
    }
}

/// Creates a symbolic link at `link` pointing to `target`.
#[cfg(unix)]
pub fn symlink(target: &Path, link: &Path) {
    std::os::unix::fs::symlink(target, link).unwrap();
}

#[cfg(unix)]
pub fn make_readable(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
}
