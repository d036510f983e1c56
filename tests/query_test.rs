mod query_tests {
    use celo_imoveis::db::listing::search_query;
    use celo_imoveis::models::listing::Listing;
    use celo_imoveis::query::{
        normalize_price, sort_listings, Busca, ListParams, ListingQuery, SortKey,
    };
    use chrono::Utc;
    use diesel::debug_query;
    use diesel::pg::Pg;

    fn params(
        busca: Option<&str>,
        dormitorios: Option<&str>,
        banheiros: Option<&str>,
        ordenar: Option<&str>,
        destaque: Option<&str>,
    ) -> ListParams {
        ListParams {
            busca: busca.map(str::to_string),
            dormitorios: dormitorios.map(str::to_string),
            banheiros: banheiros.map(str::to_string),
            ordenar: ordenar.map(str::to_string),
            destaque: destaque.map(str::to_string),
        }
    }

    fn sql(filtro: &ListingQuery) -> String {
        debug_query::<Pg, _>(&search_query(filtro)).to_string()
    }

    fn listing(id: i32, preco: &str) -> Listing {
        Listing {
            id,
            titulo: format!("Imóvel {id}"),
            descricao: "teste".to_string(),
            preco: preco.to_string(),
            dormitorios: None,
            banheiros: None,
            vagas: None,
            area: None,
            destaque: false,
            fotos: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            descricao_html: None,
        }
    }

    #[test]
    fn empty_params_mean_no_filters_newest_first() {
        let filtro = ListingQuery::from_params(&params(None, None, None, None, None));
        assert_eq!(filtro.busca, None);
        assert_eq!(filtro.min_dormitorios, None);
        assert_eq!(filtro.min_banheiros, None);
        assert!(!filtro.somente_destaque);
        assert_eq!(filtro.ordenar, SortKey::Padrao);

        let texto = sql(&filtro);
        assert!(!texto.contains("WHERE"));
        assert!(texto.contains("ORDER BY \"imoveis\".\"id\" DESC"));
    }

    #[test]
    fn hash_and_digits_is_a_direct_id_lookup() {
        let filtro = ListingQuery::from_params(&params(Some("#7"), None, None, None, None));
        assert_eq!(filtro.busca_por_id(), Some("7"));

        // Whatever else came in is irrelevant once the id shortcut fires.
        let filtro =
            ListingQuery::from_params(&params(Some(" #42 "), Some("3"), None, None, Some("1")));
        assert_eq!(filtro.busca_por_id(), Some("42"));
    }

    #[test]
    fn out_of_range_numeric_id_stays_an_id_lookup() {
        // Larger than any real id, but still digits: an empty lookup,
        // never a text search.
        let filtro =
            ListingQuery::from_params(&params(Some("#99999999999999"), None, None, None, None));
        assert_eq!(filtro.busca_por_id(), Some("99999999999999"));
        assert!("99999999999999".parse::<i32>().is_err());
    }

    #[test]
    fn hash_with_non_digits_is_plain_text_search() {
        let filtro = ListingQuery::from_params(&params(Some("#casa"), None, None, None, None));
        assert_eq!(filtro.busca_por_id(), None);
        assert_eq!(filtro.busca, Some(Busca::Texto("#casa".to_string())));

        let filtro = ListingQuery::from_params(&params(Some("#"), None, None, None, None));
        assert_eq!(filtro.busca, Some(Busca::Texto("#".to_string())));
    }

    #[test]
    fn text_search_matches_title_and_description_case_insensitively() {
        let filtro = ListingQuery::from_params(&params(Some("casa"), None, None, None, None));
        let texto = sql(&filtro);
        assert!(texto.contains("\"imoveis\".\"titulo\" ILIKE"));
        assert!(texto.contains("\"imoveis\".\"descricao\" ILIKE"));
        assert!(texto.contains(" OR "));
        assert!(texto.contains("%casa%"));
    }

    #[test]
    fn invalid_minimums_are_silently_dropped() {
        let filtro =
            ListingQuery::from_params(&params(None, Some("abc"), Some("-1"), None, None));
        assert_eq!(filtro.min_dormitorios, None);
        assert_eq!(filtro.min_banheiros, None);

        let filtro = ListingQuery::from_params(&params(None, Some(" 2 "), Some(""), None, None));
        assert_eq!(filtro.min_dormitorios, Some(2));
        assert_eq!(filtro.min_banheiros, None);
    }

    #[test]
    fn minimum_filters_treat_missing_counts_as_zero() {
        let filtro = ListingQuery::from_params(&params(None, Some("2"), Some("1"), None, None));
        let texto = sql(&filtro);
        assert!(texto.contains("COALESCE(dormitorios, 0) >= "));
        assert!(texto.contains("COALESCE(banheiros, 0) >= "));
    }

    #[test]
    fn filters_compose_conjunctively() {
        let base = ListingQuery::from_params(&params(Some("casa"), None, None, None, None));
        let estreito =
            ListingQuery::from_params(&params(Some("casa"), Some("2"), None, None, None));

        let base_sql = sql(&base);
        let estreito_sql = sql(&estreito);

        // The narrower query keeps the base clause and only ANDs a new one,
        // so it can never match more rows than the base query.
        assert!(base_sql.contains("ILIKE"));
        assert!(!base_sql.contains("COALESCE(dormitorios"));
        assert!(estreito_sql.contains("ILIKE"));
        assert!(estreito_sql.contains(" AND "));
        assert!(estreito_sql.contains("COALESCE(dormitorios, 0) >= "));
        assert!(!estreito_sql.contains(" OR NOT"));
    }

    #[test]
    fn featured_flag_restricts_regardless_of_other_filters() {
        let filtro =
            ListingQuery::from_params(&params(Some("casa"), Some("2"), None, None, Some("1")));
        assert!(filtro.somente_destaque);
        let texto = sql(&filtro);
        assert!(texto.contains("\"imoveis\".\"destaque\" = "));

        // Anything but "1" leaves the catalog unrestricted.
        let filtro = ListingQuery::from_params(&params(None, None, None, None, Some("0")));
        assert!(!filtro.somente_destaque);
    }

    #[test]
    fn sort_keys_parse_with_unknown_falling_back_to_default() {
        for (raw, esperado) in [
            (Some("preco_asc"), SortKey::PrecoAsc),
            (Some("preco_desc"), SortKey::PrecoDesc),
            (Some("area"), SortKey::AreaDesc),
            (Some("destaque"), SortKey::DestaquePrimeiro),
            (Some("default"), SortKey::Padrao),
            (Some("nonsense"), SortKey::Padrao),
            (None, SortKey::Padrao),
        ] {
            let filtro = ListingQuery::from_params(&params(None, None, None, raw, None));
            assert_eq!(filtro.ordenar, esperado, "ordenar={raw:?}");
        }
    }

    #[test]
    fn area_and_featured_sorts_happen_in_sql() {
        let filtro = ListingQuery::from_params(&params(None, None, None, Some("area"), None));
        assert!(sql(&filtro).contains("COALESCE(area, 0) DESC"));

        let filtro = ListingQuery::from_params(&params(None, None, None, Some("destaque"), None));
        let texto = sql(&filtro);
        assert!(texto.contains("\"imoveis\".\"destaque\" DESC"));
        assert!(texto.contains("\"imoveis\".\"id\" DESC"));
    }

    #[test]
    fn normalize_price_keeps_digits_only() {
        assert_eq!(normalize_price("R$ 250.000"), 250_000);
        assert_eq!(normalize_price("R$ 1.500,50"), 150_050);
        assert_eq!(normalize_price("sob consulta"), 0);
        assert_eq!(normalize_price(""), 0);
        assert!(normalize_price("R$ 50.000") < normalize_price("R$ 100.000"));
        assert!(normalize_price("R$ 100.000") < normalize_price("R$ 200.000"));
    }

    #[test]
    fn price_ascending_orders_normalized_values() {
        let mut rows = vec![
            listing(1, "R$ 100.000"),
            listing(2, "R$ 50.000"),
            listing(3, "R$ 200.000"),
        ];
        sort_listings(&mut rows, SortKey::PrecoAsc);
        let precos: Vec<&str> = rows.iter().map(|l| l.preco.as_str()).collect();
        assert_eq!(precos, ["R$ 50.000", "R$ 100.000", "R$ 200.000"]);
    }

    #[test]
    fn price_descending_reverses_and_keeps_newest_first_on_ties() {
        // Rows arrive newest-first from the database.
        let mut rows = vec![
            listing(3, "R$ 100.000"),
            listing(2, "R$ 100.000"),
            listing(1, "R$ 200.000"),
        ];
        sort_listings(&mut rows, SortKey::PrecoDesc);
        let ids: Vec<i32> = rows.iter().map(|l| l.id).collect();
        assert_eq!(ids, [1, 3, 2]);
    }

    #[test]
    fn non_price_keys_leave_row_order_to_the_database() {
        let mut rows = vec![listing(2, "R$ 2"), listing(1, "R$ 1")];
        sort_listings(&mut rows, SortKey::Padrao);
        let ids: Vec<i32> = rows.iter().map(|l| l.id).collect();
        assert_eq!(ids, [2, 1]);
    }
}
