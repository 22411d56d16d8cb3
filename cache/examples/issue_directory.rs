use parking_lot::Mutex;
use snapcache::directory::{
  ContactFields, ContactRecord, IssueCache, IssueFields, IssueRecord, IssueSource, PatchCache, PatchFields,
  PatchRecord, PatchSource, RecordStore,
};
use snapcache::RefreshingCache;
use std::convert::Infallible;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// Stands in for the remote base. Issues can be edited while the caches run.
#[derive(Default)]
struct InMemoryBase {
  issues: Mutex<Vec<IssueRecord>>,
}

impl RecordStore for InMemoryBase {
  type Error = Infallible;

  fn list_contacts(&self) -> Result<Vec<ContactRecord>, Infallible> {
    Ok(vec![ContactRecord {
      id: "recRep".to_string(),
      fields: ContactFields {
        name: "Rep. Jane Doe".to_string(),
        phone: "202-555-0100".to_string(),
        area: "US House".to_string(),
        ..Default::default()
      },
    }])
  }

  fn list_issues(&self) -> Result<Vec<IssueRecord>, Infallible> {
    Ok(self.issues.lock().clone())
  }

  fn list_additions(&self) -> Result<Vec<PatchRecord>, Infallible> {
    Ok(vec![PatchRecord {
      id: "recAdd".to_string(),
      fields: PatchFields {
        name: "Sen. John Roe".to_string(),
        phone: "202-555-0199".to_string(),
        area: "US Senate".to_string(),
        state: "OR".to_string(),
      },
    }])
  }

  fn list_deletions(&self) -> Result<Vec<PatchRecord>, Infallible> {
    Ok(Vec::new())
  }
}

fn issue(id: &str, name: &str, sort: f64) -> IssueRecord {
  IssueRecord {
    id: id.to_string(),
    fields: IssueFields {
      name: name.to_string(),
      action: "Call your representative".to_string(),
      script: "Hi, I'm a constituent calling about...".to_string(),
      contact_links: vec!["recRep".to_string()],
      inactive: false,
      sort: Some(sort),
    },
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let base = Arc::new(InMemoryBase::default());
  base.issues.lock().push(issue("rec1", "Protect net neutrality", 1.0));

  let issues: IssueCache = RefreshingCache::builder(IssueSource::new(base.clone()))
    .name("issues")
    .refresh_interval(Duration::from_secs(300))
    .build()
    .expect("Failed to load issues");
  let patches: PatchCache =
    RefreshingCache::new(PatchSource::new(base.clone()), Duration::from_secs(300)).expect("Failed to load patches");

  for issue in issues.read().iter() {
    println!("{} ({} contacts)", issue.name, issue.contacts.len());
  }
  for patch in patches.read().iter() {
    println!("{} {} in {}", patch.kind, patch.name, patch.state);
  }

  println!("\nAdding an issue upstream and forcing a reload...");
  base.issues.lock().push(issue("rec2", "Fund public schools", 0.5));
  issues.reload();
  thread::sleep(Duration::from_millis(200));

  for issue in issues.read().iter() {
    println!("{} ({} contacts)", issue.name, issue.contacts.len());
  }

  println!("\nIssue cache metrics: {:#?}", issues.metrics());

  issues.close().expect("Failed to close issue cache");
  patches.close().expect("Failed to close patch cache");
}
