//! Fake service catalog data.

use fake::Fake;
use fake::faker::company::en::{Buzzword, CatchPhrase, CompanyName};
use fake::faker::lorem::en::Sentence;

use dashboard_db::{ServiceRepository, StoreError, StoreResult};
use dashboard_models::{CreateServiceDto, CreateServiceVersionDto};

use super::models::{SeedReport, ServiceSeed, VersionSeed};

/// Generates `count` services with `versions` versions each.
///
/// Names carry their position so a single run never collides with itself.
pub fn generate_services(count: usize, versions: usize) -> Vec<ServiceSeed> {
    (0..count)
        .map(|i| {
            let company: String = CompanyName().fake();
            let buzzword: String = Buzzword().fake();
            let slug = slugify(&company);

            ServiceSeed {
                name: format!("{company} {buzzword} {}", i + 1),
                description: CatchPhrase().fake(),
                versions: (0..versions)
                    .map(|v| VersionSeed {
                        name: format!("v{}.{}.0", v + 1, (0..10).fake::<u8>()),
                        url: format!("https://{slug}.example.com/v{}", v + 1),
                        description: Sentence(3..8).fake(),
                    })
                    .collect(),
            }
        })
        .collect()
}

pub async fn insert_services<S>(store: &S, seeds: &[ServiceSeed]) -> StoreResult<SeedReport>
where
    S: ServiceRepository + ?Sized,
{
    let mut report = SeedReport::default();

    for seed in seeds {
        let service = match store
            .create_service(&CreateServiceDto {
                service_name: seed.name.clone(),
                service_description: seed.description.clone(),
            })
            .await
        {
            Ok(service) => service,
            Err(StoreError::Conflict(_)) => {
                report.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        report.services += 1;

        for version in &seed.versions {
            let dto = CreateServiceVersionDto {
                service_id: Some(service.id),
                service_version_name: version.name.clone(),
                service_version_url: version.url.clone(),
                service_version_description: version.description.clone(),
            };
            match store.create_version(service.id, &dto).await {
                Ok(_) => report.versions += 1,
                Err(StoreError::Conflict(_)) => report.skipped += 1,
                Err(e) => return Err(e),
            }
        }
    }

    Ok(report)
}

fn slugify(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    slug.split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
