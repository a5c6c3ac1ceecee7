use super::History;
use super::HISTORY_LIMIT;
use crate::domain::models::GeneratedImage;
use crate::domain::models::GenerationResult;
use crate::domain::models::ImageFile;
use crate::domain::models::Previews;
use crate::domain::models::UploadedImage;

fn result(prompt: &str) -> GenerationResult {
    return GenerationResult::new(GeneratedImage::new(None, vec![1]), prompt, vec![]);
}

#[test]
fn it_records_most_recent_first() {
    let mut history = History::default();
    history.record(result("first"));
    history.record(result("second"));

    assert_eq!(history.len(), 2);
    assert_eq!(history.get(0).unwrap().prompt(), "second");
    assert_eq!(history.get(1).unwrap().prompt(), "first");
}

#[test]
fn it_caps_at_five_dropping_oldest() {
    let mut history = History::default();
    for i in 0..8 {
        history.record(result(&format!("prompt {i}")));
    }

    assert_eq!(history.len(), HISTORY_LIMIT);
    let prompts = history
        .items()
        .iter()
        .map(|e| return e.prompt().to_string())
        .collect::<Vec<String>>();
    assert_eq!(
        prompts,
        vec!["prompt 7", "prompt 6", "prompt 5", "prompt 4", "prompt 3"]
    );
}

#[test]
fn it_returns_none_out_of_bounds() {
    let mut history = History::default();
    assert!(history.is_empty());
    assert!(history.get(0).is_none());

    history.record(result("first"));
    assert!(history.get(1).is_none());
}

#[test]
fn it_releases_source_previews_on_eviction() {
    let previews = Previews::default();
    let mut history = History::default();

    for i in 0..7 {
        let source =
            UploadedImage::new(ImageFile::new(&format!("{i}.png"), "image/png", vec![1]), &previews);
        history.record(GenerationResult::new(
            GeneratedImage::new(None, vec![1]),
            "Convert to a watercolor painting",
            vec![source.preview.clone()],
        ));
    }

    assert_eq!(previews.live(), HISTORY_LIMIT);
}
