#[macro_use]
mod common;

#[cfg(test)]
mod comment {
    tests! {
        only_line_comment in comment is OK
    }

    tests! {
        line_at_eof in comment is OK
        "ok"
    }
}
