//! Turns view models into terminal lines.

use ytclip_core::{AppViewModel, ArtifactState, LifecycleState, Mode};
use ytclip_engine::resolve_artifact_url;
use ytclip_logging::clip_warn;

/// The download link as a user can open it: resolved against the backend
/// base URL, or verbatim when it cannot be resolved.
pub fn absolute_link(base_url: &str, link: &str) -> String {
    match resolve_artifact_url(base_url, Some(link), "") {
        Ok(url) => url.to_string(),
        Err(err) => {
            clip_warn!("Using link {:?} verbatim: {}", link, err);
            link.to_string()
        }
    }
}

/// Lines describing what changed between two consecutive views.
pub fn changes(prev: &AppViewModel, next: &AppViewModel, base_url: &str) -> Vec<String> {
    let mut lines = Vec::new();

    if prev.form.url != next.form.url {
        match &next.preview {
            Some(preview) => lines.push(format!(
                "Video {} ({})",
                preview.video_id, preview.watch_url
            )),
            None if !next.form.url.trim().is_empty() => {
                lines.push("Not a recognized YouTube link yet".to_string())
            }
            None => {}
        }
    }

    if prev.phase != next.phase {
        match next.phase {
            LifecycleState::Submitting => lines.push(submitting_line(next)),
            LifecycleState::Succeeded | LifecycleState::Failed => {
                lines.extend(outcome_lines(next, base_url))
            }
            LifecycleState::Idle | LifecycleState::Validating => {}
        }
    }

    if next.copied && !prev.copied {
        lines.push("Copied!".to_string());
    }

    if prev.artifact != next.artifact {
        if let Some(line) = artifact_line(&prev.artifact, &next.artifact) {
            lines.push(line);
        }
    }

    lines
}

/// Full description of the current view, for the `status` command.
pub fn summary(view: &AppViewModel, base_url: &str) -> Vec<String> {
    let form = &view.form;
    let mut lines = vec![
        format!("State:   {}", phase_label(view.phase)),
        format!(
            "URL:     {}",
            if form.url.is_empty() { "-" } else { form.url.as_str() }
        ),
        format!("Mode:    {}", form.mode),
        format!(
            "Format:  {}",
            form.format.map(|f| f.to_string()).unwrap_or_else(|| "backend default".into())
        ),
        format!(
            "Quality: {}",
            form.quality.map(|q| q.to_string()).unwrap_or_else(|| "backend default".into())
        ),
    ];
    if form.mode == Mode::Clip {
        lines.push(format!("Range:   {} - {}", form.start_time, form.end_time));
    }
    if let Some(preview) = &view.preview {
        lines.push(format!("Thumb:   {}", preview.thumbnail_url));
    }
    if view.phase.is_terminal() {
        lines.extend(outcome_lines(view, base_url));
    }
    if let Some(line) = artifact_line(&ArtifactState::NotRequested, &view.artifact) {
        lines.push(line);
    }
    lines
}

fn submitting_line(view: &AppViewModel) -> String {
    match &view.submitted {
        Some(submitted) => match &submitted.clip_range {
            Some(range) => format!("Creating clip {} of {} ...", range, submitted.source_url),
            None => format!("Downloading {} ...", submitted.source_url),
        },
        None => "Submitting ...".to_string(),
    }
}

fn outcome_lines(view: &AppViewModel, base_url: &str) -> Vec<String> {
    if let Some(err) = &view.error {
        return vec![format!("Error: {}", err.message)];
    }
    let Some(result) = &view.result else {
        return Vec::new();
    };

    let mut lines = vec![
        "Success! Video Ready".to_string(),
        format!("Title:   {}", result.display_title()),
        format!("File:    {}", result.filename),
    ];
    if let Some(range) = result.clip_range() {
        lines.push(format!("Clipped: {range}"));
    }
    if let Some(link) = &result.download_url {
        lines.push(format!("Link:    {}", absolute_link(base_url, link)));
    }
    lines
}

fn artifact_line(prev: &ArtifactState, next: &ArtifactState) -> Option<String> {
    match next {
        ArtifactState::NotRequested => None,
        ArtifactState::Saving { bytes, total } => {
            let was_saving = matches!(prev, ArtifactState::Saving { .. });
            match total.filter(|t| *t > 0) {
                Some(total) => {
                    let bucket = |b: u64| b.saturating_mul(10) / total;
                    let prev_bucket = match prev {
                        ArtifactState::Saving { bytes, .. } => Some(bucket(*bytes)),
                        _ => None,
                    };
                    (prev_bucket != Some(bucket(*bytes))).then(|| {
                        format!("Saving ... {}% of {}", bytes * 100 / total, human_bytes(total))
                    })
                }
                None => (!was_saving).then(|| "Saving ...".to_string()),
            }
        }
        ArtifactState::Saved(saved) => Some(format!(
            "Saved {} ({}, sha256 {})",
            saved.path.display(),
            human_bytes(saved.bytes),
            saved.sha256
        )),
        ArtifactState::Failed(message) => Some(format!("Save failed: {message}")),
    }
}

fn phase_label(phase: LifecycleState) -> &'static str {
    match phase {
        LifecycleState::Idle => "idle",
        LifecycleState::Validating => "validating",
        LifecycleState::Submitting => "submitting",
        LifecycleState::Succeeded => "succeeded",
        LifecycleState::Failed => "failed",
    }
}

fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
