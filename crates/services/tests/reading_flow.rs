use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reader_core::model::{Chapter, ChapterId, ChapterWord, TextSegment, Word, WordDetail};
use services::{
    AppServices, KeepOrder, LocalDictionary, LookupClient, LookupError, ReadingError,
    ReviewState,
};
use storage::repository::{InMemoryRepository, Storage};

/// Knows one word, fails everything else, and counts requests.
#[derive(Default)]
struct OneWordClient {
    calls: AtomicUsize,
}

#[async_trait]
impl LookupClient for OneWordClient {
    async fn lookup(&self, word: &str) -> Result<WordDetail, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match word {
            "节日" => Ok(WordDetail::new("jié rì", "festival")),
            _ => Err(LookupError::EmptyResponse),
        }
    }
}

fn entry(word: &str, pinyin: &str, translation: &str) -> ChapterWord {
    ChapterWord {
        word: Word::new(word),
        pinyin: pinyin.into(),
        translation: translation.into(),
    }
}

fn setup() -> (AppServices, Arc<OneWordClient>) {
    let chapter = Chapter::new(
        ChapterId::new(1),
        "春节",
        "春节是中国的传统节日。\n大家很高兴。",
        vec![
            entry("春节", "chūn jié", "Spring Festival"),
            entry("传统", "chuán tǒng", "tradition"),
        ],
    )
    .expect("valid chapter");

    let repo = InMemoryRepository::new();
    repo.upsert_chapter(chapter.clone()).expect("seed chapter");
    let dictionary = LocalDictionary::from_chapters([&chapter]);
    let client = Arc::new(OneWordClient::default());
    let services = AppServices::from_parts(&Storage::from_in_memory(repo), dictionary, client.clone());
    (services, client)
}

#[tokio::test]
async fn read_mark_and_review_until_complete() {
    let (services, client) = setup();
    let reading = services.reading();
    let id = ChapterId::new(1);

    let view = reading.open_chapter(id).await.expect("open chapter");
    let text: String = view.segments.iter().map(TextSegment::as_text).collect();
    assert_eq!(text, view.chapter.content());
    assert!(view.segments.contains(&TextSegment::LineBreak));

    let detail = reading
        .lookup_word(id, &Word::new("传统"))
        .await
        .expect("lookup from dictionary");
    assert_eq!(detail.translation, "tradition");
    reading
        .lookup_word(id, &Word::new("节日"))
        .await
        .expect("lookup through client");
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);

    let deck = reading.build_flashcards(id).await.expect("build deck");
    assert_eq!(deck.len(), 2);
    // Both details are known by now, so no further requests are made.
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);

    let mut session = reading
        .start_review_with(id, KeepOrder)
        .await
        .expect("start review");
    let first = session.view().card().expect("first card").character().clone();

    session.flip().expect("flip");
    session.judge(false).expect("judge first");
    session.flip().expect("flip");
    let view = session.judge(true).expect("judge second");
    assert_eq!(view.round, 2);
    assert_eq!(view.card().map(|c| c.character()), Some(&first));

    session.flip().expect("flip");
    let view = session.judge(true).expect("judge retry");
    assert_eq!(view.state, ReviewState::Complete);
    assert!((view.progress() - 1.0).abs() < f64::EPSILON);

    let summary = session.finish().expect("finish");
    assert_eq!(summary.mastered, 2);
    assert_eq!(summary.rounds, 2);
    assert_eq!(summary.judgments, 3);
}

#[tokio::test]
async fn failed_lookup_still_marks_word_and_yields_sentinel_card() {
    let (services, client) = setup();
    let reading = services.reading();
    let id = ChapterId::new(1);
    let word = Word::new("高兴");

    let detail = reading.lookup_word(id, &word).await.expect("lookup");
    assert!(detail.is_sentinel());
    assert!(reading.open_chapter(id).await.expect("open").is_difficult(&word));

    // The failure was not cached, so building the deck asks again.
    let deck = reading.build_flashcards(id).await.expect("build deck");
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    assert_eq!(deck.flashcards[0].pinyin(), "?");
}

#[tokio::test]
async fn review_needs_marked_words() {
    let (services, _client) = setup();
    let err = services
        .reading()
        .start_review(ChapterId::new(1))
        .await
        .expect_err("nothing marked");
    assert!(matches!(err, ReadingError::NoDifficultWords(_)));
}
