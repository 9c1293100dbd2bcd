//! The subset of a Maven `pom.xml` the Java finder uses.

use quick_xml::Reader;
use quick_xml::events::Event;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PomLicense {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub organization: Option<String>,
    pub licenses: Vec<PomLicense>,
    pub parent_group_id: Option<String>,
    pub parent_version: Option<String>,
}

impl Pom {
    /// Own group id, inherited from `<parent>` when absent.
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id.as_deref().or(self.parent_group_id.as_deref())
    }

    pub fn effective_version(&self) -> Option<&str> {
        self.version.as_deref().or(self.parent_version.as_deref())
    }
}

pub fn parse_pom(text: &str) -> Result<Pom, quick_xml::Error> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut path: Vec<String> = Vec::new();
    let mut license = PomLicense::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                path.push(name);
            }
            Event::End(_) => {
                if is_path(&path, &["project", "licenses", "license"]) {
                    pom.licenses.push(std::mem::take(&mut license));
                }
                path.pop();
            }
            Event::Text(t) => {
                let text = t.unescape()?.trim().to_string();
                if text.is_empty() {
                    continue;
                }
                let value = Some(text);
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                match segments.as_slice() {
                    ["project", "groupId"] => pom.group_id = value,
                    ["project", "artifactId"] => pom.artifact_id = value,
                    ["project", "version"] => pom.version = value,
                    ["project", "name"] => pom.name = value,
                    ["project", "url"] => pom.url = value,
                    ["project", "organization", "name"] => pom.organization = value,
                    ["project", "parent", "groupId"] => pom.parent_group_id = value,
                    ["project", "parent", "version"] => pom.parent_version = value,
                    ["project", "licenses", "license", "name"] => license.name = value,
                    ["project", "licenses", "license", "url"] => license.url = value,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pom)
}

fn is_path(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a == b)
}
