//! Packaged-library finder: JAR, WAR and EAR files, including containers nested inside them.

use crate::location::{FoundFile, ScanLocation, collect_files, simple_name};
use crate::manifest::{Manifest, parse_properties};
use crate::pom::{Pom, parse_pom};
use crate::resolver::ArtifactCoordinates;
use crate::{Finder, FinderContext, FinderError, FinderResult};
use camino::Utf8Path;
use licenseguard_digest::DigestValue;
use licenseguard_domain::{Archive, TextMatch};
use licenseguard_types::{ArchiveType, ScanPath};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use tracing::{debug, info, warn};
use zip::ZipArchive;
use zip::result::ZipResult;

const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";
const MAVEN_DIR: &str = "META-INF/maven/";

/// Which containers become archives and which are only opened to look for more containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ContainerKind {
    Library,
    Bundle,
}

fn container_kind(file_name: &str) -> Option<ContainerKind> {
    let lower = file_name.to_ascii_lowercase();
    let (_, ext) = lower.rsplit_once('.')?;
    match ext {
        "jar" | "war" | "ear" => Some(ContainerKind::Library),
        "zip" => Some(ContainerKind::Bundle),
        _ => None,
    }
}

/// Entries of interest read out of one container.
#[derive(Debug, Default)]
struct ContainerEntries {
    manifest: Option<String>,
    pom_properties: Option<(String, String)>,
    pom_xml: Option<(String, String)>,
    license_files: Vec<(String, String)>,
    /// Index and name of each nested container, opened after the entry scan.
    nested: Vec<(usize, String)>,
}

pub struct JavaFinder {
    location: ScanLocation,
    ctx: FinderContext,
}

impl JavaFinder {
    pub fn new(location: ScanLocation, ctx: FinderContext) -> Self {
        Self { location, ctx }
    }

    fn scan_file(&self, file: &FoundFile) -> Vec<Archive> {
        match self.open_file(&file.abs, &file.path) {
            Ok((reader, digest)) => self.scan_container(reader, digest, file.path.clone(), 0),
            Err(e) => {
                warn!(path = %file.abs, error = %e, "unreadable container skipped");
                Vec::new()
            }
        }
    }

    /// The file positioned at its start, with its digest when it is a library.
    fn open_file(
        &self,
        abs: &Utf8Path,
        path: &ScanPath,
    ) -> std::io::Result<(BufReader<File>, Option<DigestValue>)> {
        let mut file = File::open(abs)?;
        let digest = match container_kind(path.file_name()) {
            Some(ContainerKind::Library) => {
                let d = self.ctx.digest_algorithm.digest(&mut file)?;
                file.seek(SeekFrom::Start(0))?;
                Some(d)
            }
            _ => None,
        };
        Ok((BufReader::new(file), digest))
    }

    /// Archives for the container at `path` (if it is a library) followed by everything nested
    /// in it, depth first in entry order.
    ///
    /// Nested containers are read into memory one at a time, and only when within the nesting
    /// limit.
    fn scan_container<R: Read + Seek>(
        &self,
        reader: R,
        digest: Option<DigestValue>,
        path: ScanPath,
        depth: usize,
    ) -> Vec<Archive> {
        let Some(kind) = container_kind(path.file_name()) else {
            return Vec::new();
        };
        let mut zip = match ZipArchive::new(reader) {
            Ok(z) => z,
            Err(e) => {
                warn!(path = %path, error = %e, "corrupt container skipped");
                return Vec::new();
            }
        };
        let entries = read_entries(&mut zip, kind, &path);

        let mut out = Vec::new();
        if kind == ContainerKind::Library {
            let mut archive = Archive::new(ArchiveType::Java, path.clone());
            archive.digest = digest;
            self.apply_metadata(&mut archive, &entries);
            self.apply_license_files(&mut archive, &entries.license_files);
            debug!(
                path = %archive.path,
                name = %archive.name,
                version = archive.version.as_deref().unwrap_or("-"),
                licenses = archive.detected().len(),
                "archive found"
            );
            out.push(archive);
        }

        for (index, entry) in &entries.nested {
            let nested_path = path.nested(entry);
            if depth + 1 > self.ctx.max_nesting_depth {
                warn!(
                    path = %nested_path,
                    max_nesting_depth = self.ctx.max_nesting_depth,
                    "nested container beyond the nesting limit skipped"
                );
                continue;
            }
            let bytes = match read_entry(&mut zip, *index) {
                Ok(b) => b,
                Err(e) => {
                    warn!(path = %nested_path, error = %e, "unreadable nested container skipped");
                    continue;
                }
            };
            let digest = (container_kind(entry) == Some(ContainerKind::Library))
                .then(|| self.ctx.digest_algorithm.digest_bytes(&bytes));
            out.extend(self.scan_container(Cursor::new(bytes), digest, nested_path, depth + 1));
        }
        out
    }

    fn apply_metadata(&self, archive: &mut Archive, entries: &ContainerEntries) {
        let manifest = entries
            .manifest
            .as_deref()
            .map(Manifest::parse)
            .unwrap_or_default();
        let props: BTreeMap<String, String> = entries
            .pom_properties
            .as_ref()
            .map(|(_, text)| parse_properties(text))
            .unwrap_or_default();
        let pom: Option<Pom> = entries.pom_xml.as_ref().and_then(|(entry, text)| {
            parse_pom(text)
                .inspect_err(|e| warn!(path = %archive.path, entry, error = %e, "malformed pom.xml ignored"))
                .ok()
        });
        let prop = |key: &str| props.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let (file_name, file_version) = name_version_from_file_name(&archive.file_name);

        archive.name = prop("artifactId")
            .or_else(|| manifest.symbolic_name())
            .or_else(|| manifest.get("Implementation-Title"))
            .or_else(|| manifest.get("Bundle-Name"))
            .unwrap_or(file_name.as_str())
            .to_string();

        archive.version = prop("version")
            .or_else(|| manifest.get("Bundle-Version"))
            .or_else(|| manifest.get("Implementation-Version"))
            .or_else(|| manifest.get("Specification-Version"))
            .or_else(|| pom.as_ref().and_then(Pom::effective_version))
            .map(str::to_string)
            .or(file_version);

        archive.vendor = manifest
            .get("Bundle-Vendor")
            .or_else(|| manifest.get("Implementation-Vendor"))
            .map(str::to_string)
            .or_else(|| pom.as_ref().and_then(|p| p.organization.clone()));

        archive.documentation_url = manifest
            .get("Bundle-DocURL")
            .map(str::to_string)
            .or_else(|| pom.as_ref().and_then(|p| p.url.clone()));

        for entry in manifest.bundle_licenses() {
            self.add_named_license(archive, &entry, MANIFEST_ENTRY);
        }
        if let (Some(pom), Some((pom_entry, _))) = (&pom, &entries.pom_xml) {
            for license in &pom.licenses {
                let found = [license.name.as_deref(), license.url.as_deref()]
                    .into_iter()
                    .flatten()
                    .find_map(|s| self.ctx.knowledge.license_by_name_or_url(s));
                match found {
                    Some(l) => archive.add_license(l, pom_entry.clone()),
                    None => debug!(path = %archive.path, license = ?license, "unknown pom license"),
                }
            }
        }

        if archive.has_detected_licenses() && archive.vendor.is_some() {
            return;
        }
        let group = prop("groupId").or_else(|| pom.as_ref().and_then(Pom::effective_group_id));
        let artifact = prop("artifactId").or_else(|| pom.as_ref().and_then(|p| p.artifact_id.as_deref()));
        if let (Some(group_id), Some(artifact_id), Some(version)) =
            (group, artifact, archive.version.clone())
        {
            let coordinates = ArtifactCoordinates {
                group_id: group_id.to_string(),
                artifact_id: artifact_id.to_string(),
                version,
            };
            self.apply_resolved(archive, &coordinates);
        }
    }

    fn apply_resolved(&self, archive: &mut Archive, coordinates: &ArtifactCoordinates) {
        let resolved = match self.ctx.resolver.resolve(coordinates) {
            Ok(Some(r)) => r,
            Ok(None) => return,
            Err(e) => {
                debug!(%coordinates, error = %e, "artifact metadata unavailable");
                return;
            }
        };
        if archive.vendor.is_none() {
            archive.vendor = resolved.vendor;
        }
        if archive.documentation_url.is_none() {
            archive.documentation_url = resolved.documentation_url;
        }
        if !archive.has_detected_licenses() {
            let source = format!("resolver:{coordinates}");
            for name in &resolved.licenses {
                self.add_named_license(archive, name, &source);
            }
        }
    }

    fn add_named_license(&self, archive: &mut Archive, name: &str, source: &str) {
        match self.ctx.knowledge.license_by_name_or_url(name) {
            Some(l) => archive.add_license(l, source),
            None => debug!(path = %archive.path, license = name, source, "unknown license name"),
        }
    }

    fn apply_license_files(&self, archive: &mut Archive, files: &[(String, String)]) {
        for (entry, text) in files {
            match self.ctx.knowledge.match_license_text(text) {
                TextMatch::Exact(l) | TextMatch::Fallback(l) => archive.add_license(l, entry.clone()),
                TextMatch::None => {
                    debug!(path = %archive.path, entry, "license file matched no known license");
                    archive.add_unmatched_license_file(entry.clone());
                }
            }
        }
    }
}

impl Finder for JavaFinder {
    fn archive_type(&self) -> ArchiveType {
        ArchiveType::Java
    }

    fn find_licenses(&self) -> Result<FinderResult, FinderError> {
        let files = collect_files(&self.location, |name| container_kind(name).is_some())?;
        info!(containers = files.len(), location = %self.location.describe(), "scanning packaged libraries");

        let archives: Vec<Archive> = files
            .par_iter()
            .map(|file| self.scan_file(file))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        Ok(FinderResult {
            scan_location: self.location.clone(),
            archives,
        })
    }
}

/// Reads the metadata and license entries of `zip` and lists its nested containers. An entry
/// that cannot be read is logged and skipped.
fn read_entries<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    kind: ContainerKind,
    path: &ScanPath,
) -> ContainerEntries {
    let mut out = ContainerEntries::default();

    for i in 0..zip.len() {
        let mut entry = match zip.by_index(i) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %path, index = i, error = %e, "unreadable entry skipped");
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let simple = simple_name(&name);

        if container_kind(simple).is_some() {
            out.nested.push((i, name));
            continue;
        }
        if kind == ContainerKind::Bundle {
            continue;
        }

        let wanted = name.eq_ignore_ascii_case(MANIFEST_ENTRY)
            || (name.starts_with(MAVEN_DIR)
                && (simple == "pom.properties" || simple == "pom.xml"))
            || licenseguard_domain::is_candidate_license_file(simple);
        if !wanted {
            continue;
        }
        let mut raw = Vec::new();
        if let Err(e) = entry.read_to_end(&mut raw) {
            warn!(path = %path, entry = %name, error = %e, "unreadable entry skipped");
            continue;
        }
        let text = String::from_utf8_lossy(&raw).into_owned();

        if name.eq_ignore_ascii_case(MANIFEST_ENTRY) {
            out.manifest = Some(text);
        } else if name.starts_with(MAVEN_DIR) && simple == "pom.properties" {
            out.pom_properties.get_or_insert((name, text));
        } else if name.starts_with(MAVEN_DIR) && simple == "pom.xml" {
            out.pom_xml.get_or_insert((name, text));
        } else {
            out.license_files.push((name, text));
        }
    }
    out
}

fn read_entry<R: Read + Seek>(zip: &mut ZipArchive<R>, index: usize) -> ZipResult<Vec<u8>> {
    let mut entry = zip.by_index(index)?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Split `commons-io-2.11.0.jar` into `commons-io` and `2.11.0`.
///
/// The version starts at the first `-` followed by a digit. Without one, the whole stem is the
/// name.
pub(crate) fn name_version_from_file_name(file_name: &str) -> (String, Option<String>) {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, ext)) if container_kind(&format!("x.{ext}")).is_some() => stem,
        _ => file_name,
    };
    let split = stem
        .char_indices()
        .find(|(i, c)| *c == '-' && stem[i + 1..].starts_with(|d: char| d.is_ascii_digit()));
    match split {
        Some((i, _)) => (stem[..i].to_string(), Some(stem[i + 1..].to_string())),
        None => (stem.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_parsing() {
        assert_eq!(
            name_version_from_file_name("commons-io-2.11.0.jar"),
            ("commons-io".to_string(), Some("2.11.0".to_string()))
        );
        assert_eq!(
            name_version_from_file_name("jackson-core-2.15.0-rc1.JAR"),
            ("jackson-core".to_string(), Some("2.15.0-rc1".to_string()))
        );
        assert_eq!(
            name_version_from_file_name("tools.jar"),
            ("tools".to_string(), None)
        );
        assert_eq!(
            name_version_from_file_name("no-extension"),
            ("no-extension".to_string(), None)
        );
    }

    #[test]
    fn container_kinds() {
        assert_eq!(container_kind("a.jar"), Some(ContainerKind::Library));
        assert_eq!(container_kind("A.WAR"), Some(ContainerKind::Library));
        assert_eq!(container_kind("a.ear"), Some(ContainerKind::Library));
        assert_eq!(container_kind("dist.zip"), Some(ContainerKind::Bundle));
        assert_eq!(container_kind("a.tar.gz"), None);
        assert_eq!(container_kind("jar"), None);
    }

    #[test]
    fn garbage_bytes_are_not_a_container() {
        let finder = JavaFinder::new(
            ScanLocation::Files(Vec::new()),
            crate::FinderContext::new(
                std::sync::Arc::new(licenseguard_domain::KnowledgeBase::default()),
                licenseguard_digest::DigestAlgorithm::Sha256,
            ),
        );
        let garbage = Cursor::new(b"definitely not a zip".to_vec());
        let archives = finder.scan_container(garbage, None, ScanPath::new("lib/x-1.0.jar"), 0);
        assert!(archives.is_empty());
    }
}
