use bookcatalog_service::client::BookCatalogClient;

use crate::bookcatalog_url;

#[tokio::test]
/// Walks the catalog the way a browser would
/// Lists the prefixes
/// Finds a prefix with results and pages through all of them
/// Opens the first book of the first page
async fn bookcatalog_browse_e2e_test() {
    let client = BookCatalogClient::new(&bookcatalog_url()).expect("Failed to create client");

    let prefixes = client.list_prefixes().await.expect("Failed to list prefixes");
    assert_eq!(prefixes.len(), 36);

    let mut first_page = None;
    for prefix in prefixes.iter() {
        if let Some(page) = client.search(prefix, 0).await.expect("Failed to search") {
            first_page = Some(page);
            break;
        }
    }
    let first_page = first_page.expect("No prefix returned any book");
    let search = first_page.search.clone();
    let total_count = first_page.page.total_count;
    assert!(!first_page.pagination.has_prev);

    // PAGE THROUGH ALL RESULTS
    let mut seen = 0;
    let mut page = first_page.clone();
    loop {
        assert!(page.page.items.len() <= page.page.limit as usize);
        assert!(page
            .page
            .items
            .windows(2)
            .all(|pair| pair[0].title <= pair[1].title));
        assert!(page.page.items.iter().all(|item| item.title.starts_with(&search)));
        seen += page.page.items.len() as u64;

        if !page.pagination.has_next {
            break;
        }
        match client
            .search(&search, page.pagination.next_offset)
            .await
            .expect("Failed to search")
        {
            Some(next) => page = next,
            // the last page is empty when the count is a multiple of the page size
            None => break,
        }
    }
    assert_eq!(seen, total_count);

    // GET BOOK
    let first_item = &first_page.page.items[0];
    let details = client
        .get_book(&first_item.book_id)
        .await
        .expect("Failed to get book")
        .expect("Book not found");
    assert_eq!(details.id, first_item.book_id);
    assert_eq!(details.title, first_item.title);
}

#[tokio::test]
async fn bookcatalog_unknown_book_e2e_test() {
    let client = BookCatalogClient::new(&bookcatalog_url()).expect("Failed to create client");

    let details = client
        .get_book("no-such-book")
        .await
        .expect("Failed to get book");
    assert!(details.is_none());
}

#[tokio::test]
/// Opens a book and asks for its reviews, zero reviews is a valid answer
async fn bookcatalog_reviews_e2e_test() {
    let client = BookCatalogClient::new(&bookcatalog_url()).expect("Failed to create client");

    let page = client
        .search("", 0)
        .await
        .expect("Failed to search")
        .expect("Catalog is empty");
    let details = client
        .get_book(&page.page.items[0].book_id)
        .await
        .expect("Failed to get book")
        .expect("Book not found");

    let reviews = client
        .get_reviews(&details.title, &details.authors)
        .await
        .expect("Failed to get reviews");
    assert_eq!(reviews.book_title, details.title);
    assert_eq!(reviews.author, details.authors.join(" and "));
}
