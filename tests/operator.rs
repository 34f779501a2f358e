#[macro_use]
mod common;

#[cfg(test)]
mod operator {
    tests! {
        arithmetic in operator is OK
        "14"
        "20"
        "5"
        "2"
    }

    tests! {
        comparison in operator is OK
        "true"
        "true"
        "true"
        "false"
    }

    tests! {
        not_number in operator is ERR
        "Operands must be numbers."
        "[line 1]"
    }

    tests! {
        divide_by_zero in operator is ERR
        "Division by zero."
        "[line 1]"
    }
}
