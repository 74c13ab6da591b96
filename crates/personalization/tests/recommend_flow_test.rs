//! End-to-end flow: CSV files on disk through training to combined
//! recommendations.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use recsys_core::RecommenderError;
    use recsys_personalization::RecommenderService;
    use tempfile::NamedTempFile;

    const ITEMS: &str = "item_id,title,description,category\n\
        1,Laptop,laptop computer,Electronics\n\
        2,Notebook,laptop notebook computer,Electronics\n\
        3,Wool Scarf,wool scarf,Clothing\n\
        4,Espresso Machine,coffee espresso maker,Kitchen\n";

    const RATINGS: &str = "user_id,item_id,rating\n\
        user1,1,5\n\
        user1,2,5\n\
        user2,1,5\n\
        user2,2,5\n\
        user2,3,4\n\
        user3,4,2\n";

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn trained() -> RecommenderService {
        let items = csv_file(ITEMS);
        let ratings = csv_file(RATINGS);
        let service = RecommenderService::default();
        service.train_from_paths(items.path(), ratings.path()).unwrap();
        service
    }

    #[test]
    fn test_full_flow() {
        let service = trained();
        let recs = service.recommend("user1", "1", 1).unwrap();

        assert_eq!(recs.content_based.len(), 1);
        assert_eq!(recs.content_based[0].item_id, "2");
        assert_eq!(recs.content_based[0].title, "Notebook");

        assert_eq!(recs.collaborative[0].item_id, "3");
        assert_eq!(recs.collaborative[0].title, "Wool Scarf");
    }

    #[test]
    fn test_content_results_exclude_anchor_and_respect_n() {
        let service = trained();
        for id in ["1", "2", "3", "4"] {
            let recs = service.recommend_similar_items(id, 3).unwrap();
            assert_eq!(recs.len(), 3);
            assert!(recs.iter().all(|r| r.item_id != id));
        }
    }

    #[test]
    fn test_collaborative_never_returns_rated_items() {
        let service = trained();
        let recs = service.recommend_for_user("user2", 10).unwrap();
        assert!(recs.iter().all(|r| r.item_id == "4"));
    }

    #[test]
    fn test_report_lists_users_and_items() {
        let items = csv_file(ITEMS);
        let ratings = csv_file(RATINGS);
        let service = RecommenderService::default();
        let report = service.train_from_paths(items.path(), ratings.path()).unwrap();
        assert_eq!(report.users, vec!["user1", "user2", "user3"]);
        let titles: Vec<&str> = report.items.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Laptop", "Notebook", "Wool Scarf", "Espresso Machine"]);
    }

    #[test]
    fn test_bad_csv_keeps_previous_model() {
        let service = trained();
        let items = csv_file(ITEMS);
        let ratings = csv_file("user_id,item_id,rating\nuser1,1,five\n");

        let err = service
            .train_from_paths(items.path(), ratings.path())
            .unwrap_err();
        assert!(matches!(err, RecommenderError::DatasetFormat(_)));

        let recs = service.recommend("user1", "1", 1).unwrap();
        assert_eq!(recs.collaborative[0].item_id, "3");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let service = RecommenderService::default();
        let ratings = csv_file(RATINGS);
        let err = service
            .train_from_paths("/does/not/exist.csv", ratings.path())
            .unwrap_err();
        assert!(matches!(err, RecommenderError::Io(_)));
        assert!(!service.is_trained());
    }

    #[test]
    fn test_empty_datasets() {
        let items = csv_file("item_id,title,description,category\n");
        let ratings = csv_file("user_id,item_id,rating\n");
        let service = RecommenderService::default();
        service.train_from_paths(items.path(), ratings.path()).unwrap();
        let recs = service.recommend("user1", "1", 5).unwrap();
        assert!(recs.collaborative.is_empty());
        assert!(recs.content_based.is_empty());
    }
}
