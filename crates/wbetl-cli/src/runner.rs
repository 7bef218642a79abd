//! Per-project orchestration shared by every job.
//!
//! A project that fails is logged and skipped so one bad account does not
//! abort the run; only a run where every project failed is an error.

use std::future::Future;

use futures::stream::{self, StreamExt};
use wbetl_core::Project;

/// What a project's collection produced. `complete` is `false` when some
/// upstream units failed and the data is partial.
pub(crate) struct Collected<T> {
    pub value: T,
    pub complete: bool,
}

pub(crate) enum ProjectOutcome<T> {
    Ok(Collected<T>),
    Err(anyhow::Error),
}

/// Successful project results, in configuration order.
pub(crate) struct RunResults<'a, T> {
    pub collected: Vec<(&'a Project, T)>,
    pub partial: usize,
    pub failed: usize,
}

/// Runs `collect` for every project with at most `max_concurrent` in flight.
///
/// # Errors
///
/// Returns an error if `projects` is non-empty and every project failed.
pub(crate) async fn run_projects<'a, T, F, Fut>(
    projects: &'a [Project],
    max_concurrent: usize,
    job: &'static str,
    collect: F,
) -> anyhow::Result<RunResults<'a, T>>
where
    F: Fn(&'a Project) -> Fut,
    Fut: Future<Output = anyhow::Result<Collected<T>>>,
{
    let outcomes: Vec<(&Project, ProjectOutcome<T>)> = stream::iter(projects)
        .map(|project| {
            let fut = collect(project);
            async move {
                tracing::info!(project = %project.name, job, "project started");
                let outcome = match fut.await {
                    Ok(collected) => ProjectOutcome::Ok(collected),
                    Err(e) => ProjectOutcome::Err(e),
                };
                (project, outcome)
            }
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    let mut results = RunResults {
        collected: Vec::with_capacity(outcomes.len()),
        partial: 0,
        failed: 0,
    };
    for (project, outcome) in outcomes {
        match outcome {
            ProjectOutcome::Ok(Collected { value, complete }) => {
                if complete {
                    tracing::info!(project = %project.name, job, "project collected");
                } else {
                    results.partial += 1;
                    tracing::warn!(
                        project = %project.name,
                        job,
                        "project collected with missing units"
                    );
                }
                results.collected.push((project, value));
            }
            ProjectOutcome::Err(e) => {
                results.failed += 1;
                tracing::error!(
                    project = %project.name,
                    job,
                    error = %format!("{e:#}"),
                    "project failed"
                );
            }
        }
    }

    if results.failed > 0 {
        tracing::warn!(
            failed_projects = results.failed,
            total_projects = projects.len(),
            job,
            "some projects failed"
        );
    }
    if !projects.is_empty() && results.failed == projects.len() {
        anyhow::bail!("all {} projects failed {job}", results.failed);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    fn projects(names: &[&str]) -> Vec<Project> {
        names
            .iter()
            .map(|n| Project {
                name: (*n).to_owned(),
                api_key: format!("key-{n}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn keeps_configuration_order_under_concurrency() {
        let projects = projects(&["a", "b", "c"]);
        let results = run_projects(&projects, 3, "test", |project| async move {
            // Earlier projects finish last.
            let delay = match project.name.as_str() {
                "a" => 30,
                "b" => 15,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(Collected {
                value: project.name.clone(),
                complete: true,
            })
        })
        .await
        .unwrap();

        let names: Vec<_> = results.collected.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn failed_project_is_skipped() {
        let projects = projects(&["ok", "broken", "partial"]);
        let results = run_projects(&projects, 1, "test", |project| async move {
            match project.name.as_str() {
                "broken" => Err(anyhow::anyhow!("upstream rejected the key")),
                "partial" => Ok(Collected {
                    value: 1,
                    complete: false,
                }),
                _ => Ok(Collected {
                    value: 2,
                    complete: true,
                }),
            }
        })
        .await
        .unwrap();

        assert_eq!(results.failed, 1);
        assert_eq!(results.partial, 1);
        let names: Vec<_> = results.collected.iter().map(|(p, _)| p.name.as_str()).collect();
        assert_eq!(names, vec!["ok", "partial"]);
    }

    #[tokio::test]
    async fn all_projects_failing_is_an_error() {
        let projects = projects(&["a", "b"]);
        let calls = AtomicUsize::new(0);
        let err = run_projects(&projects, 1, "campaigns", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<Collected<()>, _>(anyhow::anyhow!("boom")) }
        })
        .await
        .err()
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(err.to_string().contains("all 2 projects failed campaigns"));
    }
}
