use catalog_core::{paginate, sample_artifacts, Artifact, ArtifactFilter};

#[test]
fn pagination_uses_ceiling_page_count() {
    let items: Vec<u32> = (0..33).collect();
    let first = paginate(&items, 1, 16);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.items.len(), 16);
    assert!(!first.has_previous());
    assert!(first.has_next());
    assert_eq!(first.page_numbers().collect::<Vec<_>>(), vec![1, 2, 3]);

    let last = paginate(&items, 3, 16);
    assert_eq!(last.items, &[32]);
    assert!(!last.has_next());
}

#[test]
fn out_of_range_page_clamps() {
    let items: Vec<u32> = (0..5).collect();
    assert_eq!(paginate(&items, 0, 16).page, 1);
    assert_eq!(paginate(&items, 9, 2).page, 3);

    let empty: Vec<u32> = Vec::new();
    let page = paginate(&empty, 4, 16);
    assert_eq!(page.total_pages, 0);
    assert!(page.items.is_empty());
    assert!(!page.has_next());
}

#[test]
fn filter_combines_criteria() {
    let artifacts = sample_artifacts();
    let filter = ArtifactFilter {
        query: Some("ancient".into()),
        displayed_only: true,
        ..Default::default()
    };
    let hits = filter.apply(&artifacts);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].display_name(), "Ancient Vase");

    let by_genre = ArtifactFilter {
        genre: Some("painting".into()),
        ..Default::default()
    };
    assert_eq!(by_genre.apply(&artifacts)[0].id, 4);
}

#[test]
fn artifact_uses_backend_field_names() {
    let json = r#"{
        "id": 7,
        "name": "Jade Seal",
        "display": true,
        "artist_ID": "ART007",
        "gallery_ID": null,
        "imageUrl": "http://img/7"
    }"#;
    let artifact: Artifact = serde_json::from_str(json).unwrap();
    assert_eq!(artifact.artist_id.as_deref(), Some("ART007"));
    assert_eq!(artifact.gallery_id, None);
    assert_eq!(artifact.image_url.as_deref(), Some("http://img/7"));
    assert_eq!(artifact.art_id(), "7");
}
