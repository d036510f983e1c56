diesel::table! {
    imoveis (id) {
        id -> Int4,
        titulo -> Text,
        descricao -> Text,
        preco -> Text,
        dormitorios -> Nullable<Int4>,
        banheiros -> Nullable<Int4>,
        vagas -> Nullable<Int4>,
        area -> Nullable<Int4>,
        destaque -> Bool,
        fotos -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        // Added after the initial schema; kept last to match column order.
        descricao_html -> Nullable<Text>,
    }
}
